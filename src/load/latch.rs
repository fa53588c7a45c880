//! Single-assignment completion cell.
//!
//! Several sources may race to resolve a latch; the first value sticks and
//! every later `resolve` is a no-op. Any number of tasks can wait on it.

use std::sync::Arc;
use tokio::sync::watch;

/// Why the ready latch fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Every image reported its dimensions
    AllLoaded,
    /// The configured timeout elapsed first
    TimedOut,
}

/// Resolve-once cell backed by a watch channel
#[derive(Debug)]
pub struct Latch<T> {
    tx: Arc<watch::Sender<Option<T>>>,
}

impl<T> Clone for Latch<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone> Default for Latch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Latch<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Store `value` unless already resolved. Returns true if this call won.
    pub fn resolve(&self, value: T) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
            true
        })
    }

    /// The resolved value, if any
    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Wait until resolved and return the winning value
    pub async fn wait(&self) -> T {
        let mut rx = self.tx.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(value) = current {
                return value;
            }
            // `self` keeps the sender alive, so this only returns on a change.
            let _ = rx.changed().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_resolution_wins() {
        let latch = Latch::new();
        assert!(!latch.is_resolved());

        assert!(latch.resolve(Readiness::TimedOut));
        assert!(!latch.resolve(Readiness::AllLoaded));

        assert_eq!(latch.get(), Some(Readiness::TimedOut));
    }

    #[tokio::test]
    async fn test_wait_after_resolve_returns_immediately() {
        let latch = Latch::new();
        latch.resolve(7usize);
        assert_eq!(latch.wait().await, 7);
    }

    #[tokio::test]
    async fn test_wait_wakes_on_resolve_from_another_task() {
        let latch = Latch::new();
        let remote = latch.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            remote.resolve(Readiness::AllLoaded);
        });

        let waited = tokio::time::timeout(Duration::from_secs(5), latch.wait()).await;
        assert_eq!(waited.unwrap(), Readiness::AllLoaded);
    }
}
