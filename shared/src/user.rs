//! User account types

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Staff user as served over the wire (no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: String,
    /// Role name, resolved against the roles table
    pub role: String,
    pub created_at: Timestamp,
}
