use async_trait::async_trait;

// ============================================================================
// Storage Layer - Asynchronous Key-Value Persistence
// ============================================================================
//
// The cart persists a single serialized snapshot to an external key-value
// collaborator. The contract is deliberately small: get/set/remove by string
// key, string-valued, asynchronous.
//
// Backends:
// - file/   - one file per key on local storage (the on-device default)
// - memory/ - in-process map, volatile, used by tests
// - redis/  - redis-backed slot for deployments with a shared store
//
// ============================================================================

mod file;
mod memory;
mod redis_store;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use redis_store::RedisStorage;

/// The single storage slot holding the cart snapshot.
pub const CART_STORAGE_KEY: &str = "@CartMobile:cart";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("redis backend failure: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous key-value persistence contract.
///
/// A missing key is `Ok(None)`, never an error. `set` overwrites the value
/// at the key in full.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
