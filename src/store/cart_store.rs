use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::domain::cart::{Cart, CartCommand, CartError, Product, ProductDraft};
use crate::storage::{StorageError, StorageProvider, CART_STORAGE_KEY};
use crate::utils::{retry_with_backoff, RetryConfig};

// ============================================================================
// Cart Store - Shared State Container
// ============================================================================
//
// Responsibilities:
// 1. Hold the authoritative cart behind a single async mutex
// 2. Apply each mutation against the truly-latest state
// 3. Publish the new snapshot to subscribers after every change
// 4. Re-serialize the FULL list and write it to storage on every change
//
// Mutations are serialized through one critical section covering
// apply + publish + persist. Two rapid concurrent mutations therefore can
// never read the same stale base list, and persisted writes land in publish
// order.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CartStoreError {
    #[error("Cart rejected command: {0}")]
    Rejected(#[from] CartError),

    #[error("Failed to serialize cart snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to persist cart snapshot: {0}")]
    Persist(#[source] StorageError),

    #[error("Failed to read persisted cart snapshot: {0}")]
    Load(#[source] StorageError),
}

pub struct CartStore {
    storage: Arc<dyn StorageProvider>,
    state: Mutex<Cart>,
    publisher: watch::Sender<Vec<Product>>,
    retry: RetryConfig,
}

impl CartStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self::with_retry(storage, RetryConfig::default())
    }

    pub fn with_retry(storage: Arc<dyn StorageProvider>, retry: RetryConfig) -> Self {
        let (publisher, _) = watch::channel(Vec::new());
        Self {
            storage,
            state: Mutex::new(Cart::new()),
            publisher,
            retry,
        }
    }

    /// Current ordered snapshot of the cart.
    pub fn products(&self) -> Vec<Product> {
        self.publisher.borrow().clone()
    }

    /// Observe every published cart state.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.publisher.subscribe()
    }

    /// One-time initial load from storage.
    ///
    /// Only runs while the in-memory cart is still empty; once the cart has
    /// gained an entry this is a no-op. A snapshot that fails to parse or
    /// violates cart invariants falls back to the empty cart (the slot will
    /// be overwritten by the next mutation). A storage read failure is
    /// surfaced to the caller.
    pub async fn hydrate(&self) -> Result<(), CartStoreError> {
        let mut cart = self.state.lock().await;

        if !cart.is_empty() {
            tracing::debug!("Cart already populated, skipping hydration");
            return Ok(());
        }

        let blob = self
            .storage
            .get(CART_STORAGE_KEY)
            .await
            .map_err(CartStoreError::Load)?;

        let Some(blob) = blob else {
            tracing::debug!(key = CART_STORAGE_KEY, "No persisted cart snapshot");
            return Ok(());
        };

        match Cart::from_snapshot(&blob) {
            Ok(persisted) => {
                tracing::info!(
                    key = CART_STORAGE_KEY,
                    item_count = persisted.len(),
                    "Hydrated cart from persisted snapshot"
                );
                self.publisher.send_replace(persisted.items().to_vec());
                *cart = persisted;
            }
            Err(error) => {
                tracing::warn!(
                    key = CART_STORAGE_KEY,
                    error = %error,
                    "Persisted cart snapshot is invalid, starting from an empty cart"
                );
            }
        }

        Ok(())
    }

    /// Add a product: existing id gets its quantity incremented, a new id is
    /// appended with quantity 1.
    pub async fn add_to_cart(&self, draft: ProductDraft) -> Result<Vec<Product>, CartStoreError> {
        self.dispatch(CartCommand::Add(draft)).await
    }

    /// Increase the quantity of the entry with `id` by 1. Absent id: no-op.
    pub async fn increment(&self, id: impl Into<String>) -> Result<Vec<Product>, CartStoreError> {
        self.dispatch(CartCommand::Increment(id.into())).await
    }

    /// Decrease the quantity of the entry with `id` by 1, removing the entry
    /// at quantity 1. Absent id: no-op.
    pub async fn decrement(&self, id: impl Into<String>) -> Result<Vec<Product>, CartStoreError> {
        self.dispatch(CartCommand::Decrement(id.into())).await
    }

    async fn dispatch(&self, command: CartCommand) -> Result<Vec<Product>, CartStoreError> {
        // The lock is held across the persistence write on purpose: it keeps
        // the persisted snapshot sequence identical to the publish sequence.
        let mut cart = self.state.lock().await;

        let changed = cart.apply(&command)?;

        if !changed {
            tracing::debug!(
                command = command.name(),
                product_id = command.product_id(),
                "Command matched no entry, nothing to publish or persist"
            );
            return Ok(cart.items().to_vec());
        }

        let snapshot = cart.items().to_vec();
        let json = cart.to_snapshot()?;

        self.publisher.send_replace(snapshot.clone());

        retry_with_backoff(&self.retry, "persist_cart_snapshot", || {
            self.storage.set(CART_STORAGE_KEY, &json)
        })
        .await
        .into_result()
        .map_err(CartStoreError::Persist)?;

        tracing::info!(
            command = command.name(),
            product_id = command.product_id(),
            item_count = snapshot.len(),
            "Applied cart command and persisted snapshot"
        );

        Ok(snapshot)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn draft(id: &str) -> ProductDraft {
        ProductDraft {
            id: id.to_string(),
            title: format!("Product {id}"),
            image_url: format!("https://img.example/{id}.png"),
            price: 10.0,
        }
    }

    fn store_with_memory() -> (Arc<MemoryStorage>, CartStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::with_retry(storage.clone(), RetryConfig::no_retries());
        (storage, store)
    }

    #[tokio::test]
    async fn test_add_publishes_and_persists() {
        let (storage, store) = store_with_memory();

        let products = store.add_to_cart(draft("a")).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 1);
        assert_eq!(store.products(), products);

        let blob = storage.get(CART_STORAGE_KEY).await.unwrap().unwrap();
        assert!(blob.contains(r#""id":"a""#));
        assert!(blob.contains(r#""quantity":1"#));
    }

    #[tokio::test]
    async fn test_repeat_add_increments_single_entry() {
        let (_, store) = store_with_memory();

        store.add_to_cart(draft("a")).await.unwrap();
        let products = store.add_to_cart(draft("a")).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_increment_absent_id_writes_nothing() {
        let (storage, store) = store_with_memory();

        let products = store.increment("ghost").await.unwrap();

        assert!(products.is_empty());
        assert!(storage.get(CART_STORAGE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_decrement_to_zero_removes_entry_from_storage_too() {
        let (storage, store) = store_with_memory();

        store.add_to_cart(draft("a")).await.unwrap();
        let products = store.decrement("a").await.unwrap();

        assert!(products.is_empty());
        let blob = storage.get(CART_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(blob, "[]");
    }

    #[tokio::test]
    async fn test_spec_scenario_add_add_decrement_decrement() {
        let (_, store) = store_with_memory();

        let p = store.add_to_cart(draft("a")).await.unwrap();
        assert_eq!(p[0].quantity, 1);

        let p = store.add_to_cart(draft("a")).await.unwrap();
        assert_eq!(p[0].quantity, 2);

        let p = store.decrement("a").await.unwrap();
        assert_eq!(p[0].quantity, 1);

        let p = store.decrement("a").await.unwrap();
        assert!(p.is_empty());
    }

    #[tokio::test]
    async fn test_order_is_stable_under_increment() {
        let (_, store) = store_with_memory();

        store.add_to_cart(draft("a")).await.unwrap();
        store.add_to_cart(draft("b")).await.unwrap();
        let products = store.increment("a").await.unwrap();

        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_id_add_is_rejected_without_side_effects() {
        let (storage, store) = store_with_memory();

        let err = store.add_to_cart(draft("")).await.unwrap_err();

        assert!(matches!(err, CartStoreError::Rejected(CartError::MissingProductId)));
        assert!(store.products().is_empty());
        assert!(storage.get(CART_STORAGE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hydrate_restores_persisted_cart() {
        let storage = Arc::new(MemoryStorage::new());

        {
            let store = CartStore::new(storage.clone());
            store.add_to_cart(draft("a")).await.unwrap();
            store.add_to_cart(draft("b")).await.unwrap();
            store.add_to_cart(draft("b")).await.unwrap();
        }

        // "Restart": a fresh store over the same storage.
        let store = CartStore::new(storage.clone());
        assert!(store.products().is_empty());

        store.hydrate().await.unwrap();

        let products = store.products();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(products[1].quantity, 2);
    }

    #[tokio::test]
    async fn test_hydrate_with_no_snapshot_is_empty() {
        let (_, store) = store_with_memory();

        store.hydrate().await.unwrap();

        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_skips_once_cart_is_populated() {
        let (storage, store) = store_with_memory();

        store.add_to_cart(draft("a")).await.unwrap();

        // Plant a different snapshot; hydrate must not install it.
        storage
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":"z","title":"t","image_url":"u","price":1.0,"quantity":7}]"#,
            )
            .await
            .unwrap();

        store.hydrate().await.unwrap();

        let products = store.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "a");
    }

    #[tokio::test]
    async fn test_hydrate_falls_back_to_empty_on_corrupt_snapshot() {
        let (storage, store) = store_with_memory();
        storage.set(CART_STORAGE_KEY, "{{{ not json").await.unwrap();

        store.hydrate().await.unwrap();

        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_falls_back_to_empty_on_invariant_violation() {
        let (storage, store) = store_with_memory();
        storage
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":"a","title":"t","image_url":"u","price":1.0,"quantity":0}]"#,
            )
            .await
            .unwrap();

        store.hydrate().await.unwrap();

        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_is_surfaced_and_state_stays_published() {
        let (storage, store) = store_with_memory();
        storage.set_fail_writes(true);

        let err = store.add_to_cart(draft("a")).await.unwrap_err();

        assert!(matches!(err, CartStoreError::Persist(_)));
        // The mutation itself was applied and published.
        let products = store.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "a");
    }

    #[tokio::test]
    async fn test_subscribers_observe_every_change() {
        let (_, store) = store_with_memory();
        let mut rx = store.subscribe();

        store.add_to_cart(draft("a")).await.unwrap();

        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id, "a");
    }

    #[tokio::test]
    async fn test_concurrent_adds_never_lose_an_update() {
        let storage = Arc::new(MemoryStorage::new());
        let store = Arc::new(CartStore::new(storage.clone()));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add_to_cart(draft("a")).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let products = store.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 10);

        // Persisted snapshot matches the final published state.
        let blob = storage.get(CART_STORAGE_KEY).await.unwrap().unwrap();
        let restored = Cart::from_snapshot(&blob).unwrap();
        assert_eq!(restored.items(), products.as_slice());
    }
}
