//! Key-value persistence for the small slice of state that survives restarts.

use crate::errors::SocialError;
use async_trait::async_trait;

/// On-device key-value storage.
///
/// Values are opaque bytes; the app layer stores JSON.
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Load a value, `None` when the key was never written.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SocialError>;

    /// Store a value, replacing any previous one.
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), SocialError>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), SocialError>;
}
