//! Data models
//!
//! Shared between orgchart-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes (SQLite INTEGER PRIMARY KEY).

pub mod employee;
pub mod position;
pub mod user;

// Re-exports
pub use employee::*;
pub use position::*;
pub use user::*;
