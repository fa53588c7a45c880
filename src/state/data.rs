//! Shared data structures for the tiling state
//!
//! These structs represent the data model that flows between
//! the loader and the tiler.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Arbitrary key-value attributes attached to every rendered tile
pub type Data = BTreeMap<String, String>;

/// One image to tile, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Where to load the image from (a file path for the built-in probe)
    pub src: String,
    /// Attributes to attach to the rendered tile
    #[serde(default)]
    pub data: Data,
}

impl ImageDescriptor {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            data: Data::new(),
        }
    }

    /// Attach one attribute
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Parse a JSON array of descriptors
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Natural pixel size of a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Where an item is in its single load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Loading has started but not finished
    #[default]
    Pending,
    /// Natural dimensions are known
    Loaded(Dimensions),
    /// The load attempt failed; it is never retried
    Failed,
}

/// Internal per-image record, created when loading begins
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub src: String,
    /// Position in the original descriptor list
    pub index: usize,
    /// Descriptor data merged over the configured defaults
    pub data: Data,
    pub state: LoadState,
}

impl Item {
    /// Create a pending item. `defaults` are overridden by the descriptor's own data.
    pub fn new(index: usize, descriptor: ImageDescriptor, defaults: &Data) -> Self {
        let mut data = defaults.clone();
        data.extend(descriptor.data);

        Self {
            src: descriptor.src,
            index,
            data,
            state: LoadState::Pending,
        }
    }

    /// Natural dimensions, if the image has finished loading
    pub fn dimensions(&self) -> Option<Dimensions> {
        match self.state {
            LoadState::Loaded(dimensions) => Some(dimensions),
            LoadState::Pending | LoadState::Failed => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.dimensions().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_data_overrides_defaults() {
        let mut defaults = Data::new();
        defaults.insert("group".to_string(), "gallery".to_string());
        defaults.insert("kind".to_string(), "photo".to_string());

        let descriptor = ImageDescriptor::new("a.jpg").with_data("kind", "scan");
        let item = Item::new(3, descriptor, &defaults);

        assert_eq!(item.index, 3);
        assert_eq!(item.src, "a.jpg");
        assert_eq!(item.data["group"], "gallery");
        assert_eq!(item.data["kind"], "scan");
        assert_eq!(item.state, LoadState::Pending);
        assert!(!item.is_loaded());
    }

    #[test]
    fn test_descriptor_list_from_json() {
        let json = r#"[
            {"src": "one.png"},
            {"src": "two.png", "data": {"caption": "Two"}}
        ]"#;

        let list = ImageDescriptor::list_from_json(json).unwrap();

        assert_eq!(list.len(), 2);
        assert!(list[0].data.is_empty());
        assert_eq!(list[1].data["caption"], "Two");
    }
}
