//! # Workflows - Portable Business Logic
//!
//! Multi-step operations that every frontend (CLI, mobile bridge, tests)
//! shares.
//!
//! ## Design Patterns
//!
//! **1. Optimistic apply / call / reconcile**
//! - Enter the mutation lane for the key being changed
//! - Apply an [`OptimisticOp`](crate::optimistic::OptimisticOp) and publish it
//! - Await the backend with no core lock held
//! - Keep the change, or revert the op and return the error
//!
//! **2. AppCore Integration**
//! - All workflows take `&Arc<RwLock<AppCore>>`
//! - View state changes go through `AppCore::update`, which bumps the revision
//!
//! **3. Error Handling**
//! - Return `Result<T, SocialError>`; frontends pick presentation from
//!   [`SocialError::category`](solsocial_core::SocialError::category)

pub mod comments;
pub mod feed;
pub mod notifications;
pub mod persistence;
pub mod poller;
pub mod reactions;
pub mod receipts;

mod state_helpers;

pub use comments::{create_comment, load_comments, pin_comment, vote_comment};
pub use feed::{
    clear_pending, load_feed, load_more, mark_pending_viewed, merge_pending, poll_feed_once,
    polling_enabled, switch_feed, PollOutcome,
};
pub use notifications::{
    mark_all_read, mark_read, record_mention, record_notification, refresh_notifications,
    restore_persisted,
};
pub use poller::FeedPoller;
pub use reactions::{add_reaction, load_reactions, remove_reaction, share_content};
pub use receipts::{check_receipt_status, is_receipted, parse_signature, toggle_receipt};
