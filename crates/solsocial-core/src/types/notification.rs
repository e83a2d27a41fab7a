//! Notification and mention types

use crate::identifiers::{ContentId, WalletAddress};
use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone mentioned the user
    Mention,
    /// Someone replied to the user's post or comment
    Reply,
    /// Someone reacted to the user's post
    Reaction,
    /// Someone receipted the user's post
    Receipt,
    /// Someone tipped the user
    Tip,
    /// Someone followed the user
    Follow,
}

/// A notification entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Backend id
    pub id: String,
    /// Kind
    pub kind: NotificationKind,
    /// Wallet that caused it
    pub actor: WalletAddress,
    /// Related content
    #[serde(default)]
    pub content_id: Option<ContentId>,
    /// Display text
    pub text: String,
    /// When (ms since epoch)
    pub created_at_ms: u64,
    /// Whether the user has seen it
    #[serde(default)]
    pub is_read: bool,
}

/// A recently mentioned user, for composer autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Wallet
    pub wallet: WalletAddress,
    /// Display handle
    pub handle: String,
    /// Last used (ms since epoch)
    pub last_used_ms: u64,
}
