//! Board members.

use portico_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `board_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardMember {
    pub id: DbId,
    pub name: String,
    /// `board_members/default.jpg` until a photo is uploaded.
    pub image: String,
    pub position: String,
    pub about: String,
    pub linkedin: String,
    pub twitter: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateBoardMember {
    pub name: String,
    /// Defaults to "Board Member".
    pub position: Option<String>,
    pub about: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBoardMember {
    pub name: Option<String>,
    pub position: Option<String>,
    pub about: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
}
