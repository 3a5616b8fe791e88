//! # DoneLatch: one-way completion signal for a single message.
//!
//! Starts unset and transitions to set exactly once; the transition is
//! monotonic and observable by any number of waiters. The handler sets it
//! after both sub-operations resolve; the deadline extender and finalizer
//! wait on it.

use tokio_util::sync::CancellationToken;

/// One-shot boolean latch scoped to one in-flight message.
///
/// Clones share the same underlying state.
#[derive(Clone, Debug, Default)]
pub struct DoneLatch {
    inner: CancellationToken,
}

impl DoneLatch {
    /// Creates an unset latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the latch, releasing all current and future waiters. Idempotent.
    pub fn set(&self) {
        self.inner.cancel();
    }

    /// Returns true once the latch has been set.
    pub fn is_set(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Suspends until the latch is set; returns immediately if it already is.
    pub async fn wait(&self) {
        self.inner.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_unset_and_sets_once() {
        let latch = DoneLatch::new();
        assert!(!latch.is_set());

        latch.set();
        assert!(latch.is_set());

        // Setting again is harmless.
        latch.set();
        assert!(latch.is_set());
    }

    #[tokio::test]
    async fn test_releases_multiple_waiters() {
        let latch = DoneLatch::new();
        let a = latch.clone();
        let b = latch.clone();

        let wa = tokio::spawn(async move { a.wait().await });
        let wb = tokio::spawn(async move { b.wait().await });

        latch.set();
        wa.await.unwrap();
        wb.await.unwrap();
    }
}
