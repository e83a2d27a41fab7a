//! # Core Application Module
//!
//! - [`AppCore`]: the main application entry point
//! - [`AppEffects`]: effect handlers injected by the frontend
//! - [`Session`]: sign-in and connectivity status

mod app;
mod session;

pub use app::{AppCore, AppEffects};
pub use session::Session;
