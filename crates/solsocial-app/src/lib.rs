//! # SolSocial App - Portable Headless Client Core
//!
//! The state layer that screens subscribe to: comments, votes, pins,
//! reactions, shares, receipts, feed polling and notifications, with
//! optimistic updates that are reconciled against the backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            Frontends (CLI, mobile)            │
//! └───────────────────────┬───────────────────────┘
//!                         │ workflows::*
//! ┌───────────────────────▼───────────────────────┐
//! │  AppCore: config, session, ViewState, lanes   │
//! └───────────────────────┬───────────────────────┘
//!                         │ effect traits
//! ┌───────────────────────▼───────────────────────┐
//! │  SocialApiEffects · StorageEffects · clock    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let core = Arc::new(RwLock::new(AppCore::new(config, effects)?));
//! let on = workflows::toggle_receipt(&core, signature).await?;
//! let poller = FeedPoller::spawn_configured(core.clone()).await;
//! ```

pub mod core;
pub mod optimistic;
pub mod views;
pub mod workflows;

pub use crate::core::{AppCore, AppEffects, Session};
pub use crate::optimistic::{LaneKey, MutationLanes, OptimisticOp};
pub use crate::views::ViewState;
pub use crate::workflows::{FeedPoller, PollOutcome};
