//! # Shared Cart Store
//!
//! `CartStore` behind `Arc<Mutex<_>>` for callers on several tasks.
//!
//! ## Locking
//! Every call takes the lock for synchronous work only. `hydrate` and
//! `flush` do their awaiting outside the lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::state::cart::{CartStore, Hydration};

/// Cloneable handle to one `CartStore`.
#[derive(Debug, Clone)]
pub struct SharedCartStore {
    inner: Arc<Mutex<CartStore>>,
}

impl SharedCartStore {
    pub fn new(store: CartStore) -> Self {
        SharedCartStore {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    // Cart operations validate before writing; a poisoned store is consistent.
    fn lock(&self) -> MutexGuard<'_, CartStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = shared.with_store(|s| s.total_amount());
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartStore) -> R,
    {
        let store = self.lock();
        f(&store)
    }

    /// Executes a function with write access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// shared.with_store_mut(|s| s.add_item(&product, 1))?;
    /// ```
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartStore) -> R,
    {
        let mut store = self.lock();
        f(&mut store)
    }

    /// Loads the stored snapshot without holding the lock across the read.
    pub async fn hydrate(&self) -> Hydration {
        let (hydrated, repo) = self.with_store(|s| (s.is_hydrated(), s.snapshot_repository()));
        if hydrated {
            return Hydration::AlreadyHydrated;
        }

        let loaded = match repo {
            Some(repo) => repo.load().await,
            None => Ok(None),
        };

        self.with_store_mut(|s| s.apply_hydration(loaded))
    }

    /// Waits for queued snapshot writes.
    pub async fn flush(&self) {
        let writer = self.with_store(|s| s.writer());
        writer.flush().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_storage::{Storage, StorageConfig};

    #[tokio::test]
    async fn test_shared_across_tasks() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let shared = SharedCartStore::new(CartStore::new(storage.cart()));
        assert_eq!(shared.hydrate().await, Hydration::Empty);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                tokio::spawn(async move {
                    shared.with_store_mut(|s| s.select_market(if i % 2 == 0 { "m1" } else { "m2" }));
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        shared.flush().await;

        let market = shared.with_store(|s| s.selected_market_id().map(str::to_string));
        let stored = storage.cart().load().await.unwrap().unwrap();
        assert_eq!(stored.selected_market_id, market);
    }

    #[test]
    fn test_poisoned_lock_recovers() {
        let shared = SharedCartStore::new(CartStore::ephemeral());
        let clone = shared.clone();

        let _ = std::thread::spawn(move || {
            clone.with_store_mut(|_| panic!("boom"));
        })
        .join();

        shared.with_store_mut(|s| s.select_market("m1"));
        assert_eq!(shared.with_store(|s| s.selected_market_id().map(str::to_string)), Some("m1".to_string()));
    }

    #[tokio::test]
    async fn test_ephemeral_already_hydrated() {
        let shared = SharedCartStore::new(CartStore::ephemeral());
        assert_eq!(shared.hydrate().await, Hydration::AlreadyHydrated);
        shared.flush().await;
    }
}
