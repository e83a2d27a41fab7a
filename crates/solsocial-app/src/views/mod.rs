//! # View State Module
//!
//! View state types that represent what the screens currently show. These
//! types are plain data and serializable, so they can be:
//!
//! - Snapshotted for rendering
//! - Serialized for debugging
//! - Reverted field-by-field by optimistic operations

mod content_lists;

pub mod feed;
pub mod interactions;
pub mod notifications;
pub mod receipts;

use serde::{Deserialize, Serialize};

pub use content_lists::ContentLists;
pub use feed::FeedState;
pub use interactions::InteractionsState;
pub use notifications::{MergeOutcome, NotificationsState};
pub use receipts::ReceiptsState;

/// Everything the stores hold, in one value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Comments, reactions and shares
    pub interactions: InteractionsState,
    /// Local receipt flags
    pub receipts: ReceiptsState,
    /// Active feed and polling delta
    pub feed: FeedState,
    /// Notifications and mentions
    pub notifications: NotificationsState,
}
