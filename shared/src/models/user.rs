//! User Model (login accounts)

use serde::{Deserialize, Serialize};

/// User account row. `hash_pass` never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: i64,
}
