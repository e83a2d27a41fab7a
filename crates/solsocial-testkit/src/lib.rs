//! # SolSocial Testkit
//!
//! Deterministic effect handlers and fixtures for testing the client core.
//!
//! | effect | production | test |
//! |---|---|---|
//! | backend | `HttpSocialApi` | [`MockSocialApi`] |
//! | storage | `FileStorage` | [`MemoryStorage`] |
//! | clock | `SystemClock` | [`ManualClock`] |

pub mod fixtures;
pub mod mock_api;
pub mod storage;
pub mod time;

pub use mock_api::{ApiCall, ApiOp, MockSocialApi};
pub use storage::MemoryStorage;
pub use time::ManualClock;
