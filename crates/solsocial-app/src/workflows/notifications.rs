//! Notifications Workflow - Portable Business Logic
//!
//! The list, unread counter and recent mentions survive restarts. Every
//! mutation persists from a snapshot taken after the change, outside the
//! core lock. The notifications lane is held from the change through the
//! write, so persisted snapshots land in the order they were taken.

use crate::optimistic::LaneKey;
use crate::views::NotificationsState;
use crate::workflows::persistence::{load_notifications, save_mentions, save_notifications};
use crate::workflows::state_helpers::{handles, with_views};
use crate::AppCore;
use async_lock::RwLock;
use solsocial_core::types::{Mention, Notification};
use solsocial_core::{SocialError, WalletAddress};
use std::sync::Arc;

/// Load persisted notifications into the view state (startup).
///
/// **Returns**: The unread count restored.
pub async fn restore_persisted(app_core: &Arc<RwLock<AppCore>>) -> usize {
    let h = handles(app_core).await;
    let _lane = h.lane(LaneKey::Notifications).await;
    let restored = load_notifications(h.storage.as_ref()).await;
    let unread = restored.unread_count();
    tracing::debug!(
        notifications = restored.notifications().len(),
        mentions = restored.mentions().len(),
        unread,
        "notification state restored"
    );
    with_views(app_core, |views| views.notifications = restored).await;
    unread
}

/// Record an incoming notification.
///
/// **Returns**: `false` if a notification with this id is already held.
pub async fn record_notification(
    app_core: &Arc<RwLock<AppCore>>,
    notification: Notification,
) -> Result<bool, SocialError> {
    let h = handles(app_core).await;
    let cap = h.config.notifications.max_notifications;
    let _lane = h.lane(LaneKey::Notifications).await;
    let (inserted, snapshot) = with_views(app_core, |views| {
        let inserted = views.notifications.record(notification, cap);
        (inserted, views.notifications.clone())
    })
    .await;
    if inserted {
        save_notifications(h.storage.as_ref(), &snapshot).await?;
    }
    Ok(inserted)
}

/// Mark every notification read.
pub async fn mark_all_read(app_core: &Arc<RwLock<AppCore>>) -> Result<(), SocialError> {
    let h = handles(app_core).await;
    let _lane = h.lane(LaneKey::Notifications).await;
    let snapshot = with_views(app_core, |views| {
        views.notifications.mark_all_read();
        views.notifications.clone()
    })
    .await;
    save_notifications(h.storage.as_ref(), &snapshot).await
}

/// Mark one notification read.
///
/// **Returns**: `false` when the id is unknown or was already read.
pub async fn mark_read(app_core: &Arc<RwLock<AppCore>>, id: &str) -> Result<bool, SocialError> {
    let h = handles(app_core).await;
    let _lane = h.lane(LaneKey::Notifications).await;
    let (changed, snapshot) = with_views(app_core, |views| {
        let changed = views.notifications.mark_read(id);
        (changed, views.notifications.clone())
    })
    .await;
    if changed {
        save_notifications(h.storage.as_ref(), &snapshot).await?;
    }
    Ok(changed)
}

/// Remember a mentioned user for composer autocomplete.
pub async fn record_mention(
    app_core: &Arc<RwLock<AppCore>>,
    wallet: WalletAddress,
    handle: impl Into<String>,
) -> Result<(), SocialError> {
    let h = handles(app_core).await;
    let mention = Mention {
        wallet,
        handle: handle.into(),
        last_used_ms: h.now_ms,
    };
    let cap = h.config.notifications.max_mentions;
    let _lane = h.lane(LaneKey::Notifications).await;
    let snapshot: NotificationsState = with_views(app_core, |views| {
        views.notifications.record_mention(mention, cap);
        views.notifications.clone()
    })
    .await;
    save_mentions(h.storage.as_ref(), &snapshot).await
}

/// Fetch notifications from the backend and merge them by id.
///
/// Held notifications the backend reports read are marked read locally and
/// the unread counter follows.
///
/// **Returns**: How many were new.
pub async fn refresh_notifications(app_core: &Arc<RwLock<AppCore>>) -> Result<usize, SocialError> {
    let h = handles(app_core).await;
    h.require_wallet("load notifications")?;
    let cap = h.config.notifications.max_notifications;
    let limit = u32::try_from(cap).unwrap_or(u32::MAX);

    let fetched = h.api.fetch_notifications(limit).await.map_err(|error| {
        tracing::warn!(error = %error, "failed to refresh notifications");
        error
    })?;
    let _lane = h.lane(LaneKey::Notifications).await;
    let (outcome, snapshot) = with_views(app_core, |views| {
        let outcome = views.notifications.merge_fetched(fetched, cap);
        (outcome, views.notifications.clone())
    })
    .await;
    if outcome.changed() {
        tracing::debug!(
            added = outcome.added,
            marked_read = outcome.marked_read,
            "notifications merged"
        );
        save_notifications(h.storage.as_ref(), &snapshot).await?;
    }
    Ok(outcome.added)
}
