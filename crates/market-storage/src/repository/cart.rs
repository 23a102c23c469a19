//! # Cart Snapshot Repository
//!
//! Persists the cart as one JSON record.
//!
//! ## Record Format
//! ```text
//! key:   @market-app:cart
//! value: { "items": [ { "product": {...}, "quantity": 2 } ],
//!          "selectedMarketId": "m1" }
//! ```
//!
//! A record that no longer parses is treated as absent: the session starts
//! from an empty cart rather than failing to start.

use market_core::CartSnapshot;
use tracing::warn;

use crate::error::StorageResult;
use crate::repository::kv::KeyValueRepository;

/// Storage key of the cart snapshot.
pub const CART_STORAGE_KEY: &str = "@market-app:cart";

/// Repository for the persisted cart.
#[derive(Debug, Clone)]
pub struct CartSnapshotRepository {
    kv: KeyValueRepository,
}

impl CartSnapshotRepository {
    pub fn new(kv: KeyValueRepository) -> Self {
        CartSnapshotRepository { kv }
    }

    /// Loads the stored snapshot.
    ///
    /// ## Returns
    /// * `Ok(Some(_))` - A valid snapshot
    /// * `Ok(None)` - Nothing stored, or the record is malformed
    /// * `Err(_)` - The store could not be read
    pub async fn load(&self) -> StorageResult<Option<CartSnapshot>> {
        let Some(raw) = self.kv.get(CART_STORAGE_KEY).await? else {
            return Ok(None);
        };

        match CartSnapshot::from_json(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed cart snapshot");
                Ok(None)
            }
        }
    }

    /// Replaces the stored snapshot.
    pub async fn save(&self, snapshot: &CartSnapshot) -> StorageResult<()> {
        let json = snapshot.to_json()?;
        self.save_json(&json).await
    }

    /// Replaces the stored snapshot with already-serialized JSON.
    pub async fn save_json(&self, json: &str) -> StorageResult<()> {
        self.kv.set(CART_STORAGE_KEY, json).await
    }

    pub async fn clear(&self) -> StorageResult<()> {
        self.kv.remove(CART_STORAGE_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Storage, StorageConfig};
    use chrono::Utc;
    use market_core::{CartLine, Money, PricedProduct, Product};

    fn snapshot() -> CartSnapshot {
        let product = Product {
            id: "p1".to_string(),
            market_id: "m1".to_string(),
            name: "Café 500g".to_string(),
            description: String::new(),
            price: Money::from_cents(1890),
            stock: 4,
            discount: 0,
            image_url: String::new(),
            category: "Mercearia".to_string(),
            subcategory: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        CartSnapshot {
            items: vec![CartLine {
                product: PricedProduct::new(product, Money::from_cents(1890)),
                quantity: 2,
            }],
            selected_market_id: Some("m1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_load_empty() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        assert_eq!(storage.cart().load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let repo = storage.cart();

        let saved = snapshot();
        repo.save(&saved).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_malformed_record_loads_as_none() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        storage.kv().set(CART_STORAGE_KEY, "{not json").await.unwrap();

        assert_eq!(storage.cart().load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let repo = storage.cart();

        repo.save(&snapshot()).await.unwrap();
        repo.clear().await.unwrap();

        assert_eq!(repo.load().await.unwrap(), None);
    }
}
