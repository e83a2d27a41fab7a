//! Persisted notification state.
//!
//! Three keys, each a JSON document. Missing keys load as empty; corrupt
//! payloads are logged and treated as missing so a bad write never blocks
//! startup.

use crate::views::NotificationsState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use solsocial_core::effects::StorageEffects;
use solsocial_core::types::{Mention, Notification};
use solsocial_core::SocialError;

/// Storage key for the notification list.
pub const NOTIFICATIONS_KEY: &str = "notifications.list";
/// Storage key for the unread counter.
pub const UNREAD_COUNT_KEY: &str = "notifications.unread_count";
/// Storage key for recent mentions.
pub const MENTIONS_KEY: &str = "mentions.recent";

/// Load all three keys.
pub async fn load_notifications(storage: &dyn StorageEffects) -> NotificationsState {
    let notifications: Vec<Notification> = load_or_default(storage, NOTIFICATIONS_KEY).await;
    let unread_count: usize = load_or_default(storage, UNREAD_COUNT_KEY).await;
    let mentions: Vec<Mention> = load_or_default(storage, MENTIONS_KEY).await;
    NotificationsState::restore(notifications, unread_count, mentions)
}

/// Write the notification list and unread counter.
pub async fn save_notifications(
    storage: &dyn StorageEffects,
    state: &NotificationsState,
) -> Result<(), SocialError> {
    store_json(storage, NOTIFICATIONS_KEY, &state.notifications()).await?;
    store_json(storage, UNREAD_COUNT_KEY, &state.unread_count()).await
}

/// Write recent mentions.
pub async fn save_mentions(
    storage: &dyn StorageEffects,
    state: &NotificationsState,
) -> Result<(), SocialError> {
    store_json(storage, MENTIONS_KEY, &state.mentions()).await
}

async fn load_or_default<T: DeserializeOwned + Default>(storage: &dyn StorageEffects, key: &str) -> T {
    match storage.load(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring corrupt persisted value");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read persisted value");
            T::default()
        }
    }
}

async fn store_json<T: Serialize + ?Sized>(
    storage: &dyn StorageEffects,
    key: &str,
    value: &T,
) -> Result<(), SocialError> {
    let bytes = serde_json::to_vec(value)?;
    storage.store(key, bytes).await
}
