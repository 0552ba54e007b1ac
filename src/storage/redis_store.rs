use async_trait::async_trait;
use redis::AsyncCommands;

use super::{StorageError, StorageProvider};

// ============================================================================
// Redis Storage - Shared Key-Value Backend
// ============================================================================

/// Cart storage slot held in redis.
///
/// The multiplexed connection is cheap to clone and reconnects internally,
/// so one client handle is shared across all calls.
pub struct RedisStorage {
    client: redis::Client,
}

impl RedisStorage {
    pub fn new(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StorageProvider for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
