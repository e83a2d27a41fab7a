//! Production effect handlers for the SolSocial client core
//!
//! - [`HttpSocialApi`]: the backend REST API over reqwest
//! - [`FileStorage`]: key-value persistence as one JSON file per key
//!
//! The wire format lives in [`wire`]; the stores only ever see the domain
//! types from `solsocial-core`.

pub mod file_storage;
pub mod http_api;
pub mod wire;

pub use file_storage::FileStorage;
pub use http_api::HttpSocialApi;
