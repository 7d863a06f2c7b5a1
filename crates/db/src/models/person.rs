//! People (technical staff profiles).

use portico_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `people` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Person {
    pub id: DbId,
    pub name: String,
    pub profile_picture: Option<String>,
    pub profession: String,
    pub department: String,
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreatePerson {
    pub name: String,
    pub profession: Option<String>,
    /// Defaults to "tech".
    pub department: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePerson {
    pub name: Option<String>,
    pub profession: Option<String>,
    pub department: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}
