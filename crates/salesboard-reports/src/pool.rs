//! Bounded pool of record-store handles with scoped checkout.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{trace, warn};

use crate::store::SalesStore;
use salesboard_common::{Result, SalesError};

/// Limits how many requests read the store at once.
///
/// Handles are released when the [`PooledStore`] guard drops.
pub struct StorePool {
    store: Arc<dyn SalesStore>,
    permits: Semaphore,
    size: usize,
    acquire_timeout: Duration,
}

impl StorePool {
    /// Creates a pool of `size` handles over `store`.
    pub fn new(store: Arc<dyn SalesStore>, size: usize, acquire_timeout: Duration) -> Self {
        Self {
            store,
            permits: Semaphore::new(size),
            size,
            acquire_timeout,
        }
    }

    /// Total number of handles.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Handles not currently checked out.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Checks out a handle, waiting up to the acquire timeout.
    pub async fn acquire(&self) -> Result<PooledStore<'_>> {
        let permit = tokio::time::timeout(self.acquire_timeout, self.permits.acquire())
            .await
            .map_err(|elapsed| {
                warn!(
                    timeout_ms = self.acquire_timeout.as_millis(),
                    "Store pool exhausted"
                );
                SalesError::data_access_with_source("Timed out waiting for a store handle", elapsed)
            })?
            .map_err(|closed| SalesError::data_access_with_source("Store pool closed", closed))?;

        trace!(available = self.available(), "Store handle acquired");
        Ok(PooledStore {
            store: self.store.as_ref(),
            _permit: permit,
        })
    }
}

/// A checked-out store handle.
pub struct PooledStore<'a> {
    store: &'a (dyn SalesStore + 'static),
    _permit: SemaphorePermit<'a>,
}

impl Deref for PooledStore<'_> {
    type Target = dyn SalesStore;

    fn deref(&self) -> &Self::Target {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn pool(size: usize) -> StorePool {
        StorePool::new(
            Arc::new(InMemoryStore::default()),
            size,
            Duration::from_millis(20),
        )
    }

    #[tokio::test]
    async fn test_guard_releases_on_drop() {
        let pool = pool(2);
        assert_eq!(pool.available(), 2);
        {
            let _first = pool.acquire().await.unwrap();
            let _second = pool.acquire().await.unwrap();
            assert_eq!(pool.available(), 0);
        }
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.size(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_pool_times_out() {
        let pool = pool(1);
        let _held = pool.acquire().await.unwrap();
        let err = pool.acquire().await.err().unwrap();
        assert!(matches!(err, SalesError::DataAccess { .. }));
    }
}
