//! Shared types for orgchart
//!
//! Data models, the unified error system, pagination and the small
//! utilities used by both the server and API clients.

pub mod client;
pub mod error;
pub mod models;
pub mod types;
pub mod util;
pub mod validation;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
pub use types::Page;
