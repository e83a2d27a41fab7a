//! Domain types shared by the stores, the HTTP adapter and test mocks.

pub mod comment;
pub mod feed;
pub mod notification;
pub mod reaction;

use serde::{Deserialize, Serialize};

pub use comment::{Comment, CreateCommentRequest, VoteDirection};
pub use feed::{FeedItem, FeedKind, FeedPage};
pub use notification::{Mention, Notification, NotificationKind};
pub use reaction::{Reaction, ReactionCount, ReactionKind, ReactionRequest, ReactionSummary, ShareSummary};

/// Receipt mutation sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptAction {
    /// Save the post
    Add,
    /// Unsave the post
    Remove,
}

impl ReceiptAction {
    /// Action that moves the receipt into `receipted`.
    #[must_use]
    pub fn toward(receipted: bool) -> Self {
        if receipted {
            Self::Add
        } else {
            Self::Remove
        }
    }

    /// Wire label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

/// Backend acknowledgement of a receipt mutation.
///
/// The backend can answer successfully at the HTTP level and still refuse the
/// action; `success == false` is that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptAck {
    /// Whether the action took effect
    pub success: bool,
    /// Reason when refused
    #[serde(default)]
    pub message: Option<String>,
}

impl ReceiptAck {
    /// Accepted acknowledgement.
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Refused acknowledgement.
    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
