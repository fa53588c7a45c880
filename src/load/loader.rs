//! Image loader
//!
//! Starts one load per descriptor and tracks how many are still outstanding.
//! The ready latch fires when the count reaches zero or when the optional
//! timeout elapses, whichever happens first.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task;

use super::latch::{Latch, Readiness};
use super::probe::DimensionProbe;
use crate::error::ThumbTileError;
use crate::state::data::{ImageDescriptor, Item, LoadState};
use crate::state::options::Options;

/// Item collection shared between load tasks and the tiler
pub type Items = Arc<Mutex<Vec<Item>>>;

/// Lock the item collection, recovering from a poisoned lock
pub(crate) fn lock_items(items: &Items) -> MutexGuard<'_, Vec<Item>> {
    items.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a running batch of loads
#[derive(Debug, Clone)]
pub struct Loader {
    items: Items,
    outstanding: Arc<AtomicUsize>,
    ready: Latch<Readiness>,
}

impl Loader {
    /// Push a pending item per descriptor into `items` and begin loading.
    ///
    /// Items are appended before any load finishes, so the tiler may see
    /// them still pending. Must be called from within a tokio runtime.
    pub fn start(
        items: Items,
        descriptors: Vec<ImageDescriptor>,
        options: &Options,
        probe: Arc<dyn DimensionProbe>,
    ) -> Self {
        let loader = Self {
            items,
            outstanding: Arc::new(AtomicUsize::new(descriptors.len())),
            ready: Latch::new(),
        };

        if descriptors.is_empty() {
            tracing::debug!("No images to load");
            loader.ready.resolve(Readiness::AllLoaded);
        }

        let first_slot = lock_items(&loader.items).len();

        for (index, descriptor) in descriptors.into_iter().enumerate() {
            let item = Item::new(index, descriptor, &options.data);
            let src = item.src.clone();
            lock_items(&loader.items).push(item);

            tokio::spawn(loader.clone().load_one(
                first_slot + index,
                src,
                Arc::clone(&probe),
                options.count_failures,
            ));
        }

        if let Some(timeout) = options.timeout_duration() {
            let ready = loader.ready.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                if ready.resolve(Readiness::TimedOut) {
                    tracing::info!("⏱️  Load timeout after {:?}, rendering what is ready", timeout);
                }
            });
        }

        loader
    }

    async fn load_one(
        self,
        slot: usize,
        src: String,
        probe: Arc<dyn DimensionProbe>,
        count_failures: bool,
    ) {
        let probe_src = src.clone();
        let outcome = task::spawn_blocking(move || probe.probe(&probe_src))
            .await
            .map_err(ThumbTileError::from)
            .and_then(|result| result);

        let loaded = match outcome {
            Ok(dimensions) => {
                tracing::debug!("Loaded {} ({}x{})", src, dimensions.width, dimensions.height);
                self.set_state(slot, LoadState::Loaded(dimensions));
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", src, e);
                self.set_state(slot, LoadState::Failed);
                false
            }
        };

        if loaded || count_failures {
            self.finish_one();
        }
    }

    fn set_state(&self, slot: usize, state: LoadState) {
        if let Some(item) = lock_items(&self.items).get_mut(slot) {
            item.state = state;
        }
    }

    fn finish_one(&self) {
        let previous = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| count.checked_sub(1));

        if previous == Ok(1) && self.ready.resolve(Readiness::AllLoaded) {
            tracing::info!("✅ All images loaded");
        }
    }

    /// Loads that have not finished yet
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Latch resolved on all-loaded or timeout
    pub fn ready(&self) -> Latch<Readiness> {
        self.ready.clone()
    }

    pub fn items(&self) -> Items {
        Arc::clone(&self.items)
    }
}
