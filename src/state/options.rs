//! Tiling options
//!
//! Options are plain serde data so they can be loaded from a JSON file and
//! patched at runtime. A patch is deep-merged: absent fields keep their
//! current value and the `data` map merges key by key.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use super::data::Data;
use crate::error::Result;

/// All layout and loading options for one tile instance
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Options {
    /// Pixel spacing between tiles in a row and between rows
    pub gutter: f64,

    /// Height every image is normalized to before row fitting
    pub base: f64,

    /// Maximum number of rows to render
    /// - None or 0 = unlimited
    pub rows: Option<usize>,

    /// Milliseconds to wait for pending loads before rendering anyway
    /// - None or 0 = wait for every image
    pub timeout: Option<u64>,

    /// Default data merged under each descriptor's own data
    pub data: Data,

    /// Count failed loads as finished so the all-loaded signal can still fire
    /// without a timeout. Off by default: a broken image stalls until timeout.
    pub count_failures: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            gutter: 10.0,
            base: 150.0,
            rows: None,
            timeout: None,
            data: Data::new(),
            count_failures: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row cap, with 0 treated as unlimited
    pub fn row_limit(&self) -> Option<usize> {
        self.rows.filter(|&rows| rows > 0)
    }

    /// Timeout duration, with 0 treated as "no timeout"
    pub fn timeout_duration(&self) -> Option<std::time::Duration> {
        self.timeout
            .filter(|&ms| ms > 0)
            .map(std::time::Duration::from_millis)
    }

    /// Deep-merge a patch into these options
    pub fn merge(&mut self, patch: OptionsPatch) {
        if let Some(gutter) = patch.gutter {
            self.gutter = gutter;
        }
        if let Some(base) = patch.base {
            self.base = base;
        }
        if let Some(rows) = patch.rows {
            self.rows = rows;
        }
        if let Some(timeout) = patch.timeout {
            self.timeout = timeout;
        }
        if let Some(data) = patch.data {
            self.data.extend(data);
        }
        if let Some(count_failures) = patch.count_failures {
            self.count_failures = count_failures;
        }
    }

    /// Return a copy with the patch applied
    pub fn merged(mut self, patch: OptionsPatch) -> Self {
        self.merge(patch);
        self
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read options from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Load from the default config path, falling back to defaults when absent
    pub fn load_or_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading options from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Partial options. `rows` and `timeout` tell "absent" apart from an explicit
/// `null`, so a patch can reset them to unlimited.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OptionsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gutter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub rows: Option<Option<usize>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Option<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_failures: Option<bool>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gutter(mut self, gutter: f64) -> Self {
        self.gutter = Some(gutter);
        self
    }

    pub fn base(mut self, base: f64) -> Self {
        self.base = Some(base);
        self
    }

    pub fn rows(mut self, rows: Option<usize>) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data
            .get_or_insert_with(Data::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn count_failures(mut self, count_failures: bool) -> Self {
        self.count_failures = Some(count_failures);
        self
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Options> for OptionsPatch {
    /// A patch that overwrites every field
    fn from(options: Options) -> Self {
        Self {
            gutter: Some(options.gutter),
            base: Some(options.base),
            rows: Some(options.rows),
            timeout: Some(options.timeout),
            data: Some(options.data),
            count_failures: Some(options.count_failures),
        }
    }
}

/// A present field (even `null`) becomes `Some(..)`; an absent one stays `None` via `default`
fn explicit_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// ~/.config/thumbtile/options.json on Linux
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
    path.push("thumbtile");
    path.push("options.json");
    Some(path)
}
