//! # Notification View State
//!
//! Bounded notification list, unread counter and recent mentions.
//!
//! The unread counter is tracked separately from the `is_read` flags: it is
//! incremented on arrival and persisted on its own, so a restored counter
//! survives even when the list was truncated.

use serde::{Deserialize, Serialize};
use solsocial_core::types::{Mention, Notification};

/// What a merge of fetched notifications changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Notifications inserted
    pub added: usize,
    /// Held notifications the backend reported read
    pub marked_read: usize,
}

impl MergeOutcome {
    /// Whether anything changed.
    pub fn changed(&self) -> bool {
        self.added > 0 || self.marked_read > 0
    }
}

/// Notifications and mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsState {
    notifications: Vec<Notification>,
    unread_count: usize,
    mentions: Vec<Mention>,
}

impl NotificationsState {
    /// Rebuild from persisted parts.
    pub fn restore(notifications: Vec<Notification>, unread_count: usize, mentions: Vec<Mention>) -> Self {
        Self {
            notifications,
            unread_count,
            mentions,
        }
    }

    /// Notifications, newest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Unread counter.
    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    /// Recent mentions, most recently used first.
    pub fn mentions(&self) -> &[Mention] {
        &self.mentions
    }

    /// Insert a new notification at the head.
    ///
    /// A notification whose id is already held is ignored. The list is
    /// truncated to `cap` entries. Returns whether it was inserted.
    pub fn record(&mut self, notification: Notification, cap: usize) -> bool {
        if self.notifications.iter().any(|n| n.id == notification.id) {
            return false;
        }
        if !notification.is_read {
            self.unread_count += 1;
        }
        self.notifications.insert(0, notification);
        self.notifications.truncate(cap);
        true
    }

    /// Merge a batch fetched from the backend (newest first).
    ///
    /// Unknown ids are inserted. A held notification the backend reports read
    /// is marked read here too; read is never undone by a fetch, since local
    /// reads are not sent to the backend.
    pub fn merge_fetched(&mut self, fetched: Vec<Notification>, cap: usize) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        // Oldest first so the newest ends up at the head.
        for notification in fetched.into_iter().rev() {
            let held = self.notifications.iter().any(|n| n.id == notification.id);
            if !held {
                if self.record(notification, cap) {
                    outcome.added += 1;
                }
            } else if notification.is_read && self.mark_read(&notification.id) {
                outcome.marked_read += 1;
            }
        }
        outcome
    }

    /// Mark every notification read and zero the counter.
    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.is_read = true;
        }
        self.unread_count = 0;
    }

    /// Mark one notification read. Returns `false` if unknown or already read.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) if !notification.is_read => {
                notification.is_read = true;
                self.unread_count = self.unread_count.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Move a mention to the front, deduplicated by wallet, truncated to `cap`.
    pub fn record_mention(&mut self, mention: Mention, cap: usize) {
        self.mentions.retain(|m| m.wallet != mention.wallet);
        self.mentions.insert(0, mention);
        self.mentions.truncate(cap);
    }
}
