//! Publications: downloadable documents with an optional cover image.

use portico_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `publications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Publication {
    pub id: DbId,
    pub title: String,
    pub publication_type: String,
    pub author: String,
    pub document: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreatePublication {
    pub title: String,
    pub publication_type: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePublication {
    pub title: Option<String>,
    pub publication_type: Option<String>,
    pub author: Option<String>,
}
