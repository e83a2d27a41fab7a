//! SolSocial Core - Shared Client Types
//!
//! This crate holds everything the client state layer and its adapters agree on:
//!
//! - Identifiers: [`ContentId`] (the one canonical key every store uses),
//!   [`CommentId`], [`WalletAddress`], [`ReceiptSignature`]
//! - Domain types: comments, reactions, shares, receipts, feed pages, notifications
//! - Error taxonomy: [`SocialError`] and [`ErrorCategory`]
//! - Effect traits: the backend API, key-value storage and the wall clock
//! - Configuration: [`ClientConfig`] loaded from TOML
//!
//! # Architecture
//!
//! This crate has no runtime dependencies. The HTTP adapter lives in
//! `solsocial-transport`, the stores and workflows in `solsocial-app`.

pub mod config;
pub mod effects;
pub mod errors;
pub mod identifiers;
pub mod types;

pub use config::ClientConfig;
pub use errors::{ErrorCategory, Result, SocialError, ToastLevel};
pub use identifiers::{CommentId, ContentId, ContentRef, ReceiptSignature, WalletAddress};
