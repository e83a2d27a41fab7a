//! Effect traits
//!
//! The stores never talk to the network, the disk or the wall clock directly.
//! They go through these traits so that:
//! - the HTTP adapter (`solsocial-transport`) can be swapped for a mock
//! - tests control time and failures deterministically
//!
//! | trait | production handler | test handler |
//! |---|---|---|
//! | [`SocialApiEffects`] | `HttpSocialApi` | `MockSocialApi` |
//! | [`StorageEffects`] | `FileStorage` | `MemoryStorage` |
//! | [`PhysicalTimeEffects`] | [`SystemClock`] | `ManualClock` |

pub mod api;
pub mod storage;
pub mod time;

pub use api::SocialApiEffects;
pub use storage::StorageEffects;
pub use time::{PhysicalTimeEffects, SystemClock};
