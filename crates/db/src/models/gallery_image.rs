//! Standalone gallery images.

use portico_core::gallery::GalleryCategory;
use portico_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `gallery_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GalleryImage {
    pub id: DbId,
    pub image: String,
    pub alt_text: String,
    pub category: String,
    pub is_active: bool,
    pub related_project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GalleryImage {
    pub fn category(&self) -> Option<GalleryCategory> {
        GalleryCategory::from_name(&self.category)
    }
}

/// Category arrives as free text and is checked against the vocabulary by
/// the handler before it reaches the table.
#[derive(Debug, Deserialize)]
pub struct CreateGalleryImage {
    pub alt_text: Option<String>,
    pub category: String,
    pub is_active: Option<bool>,
    pub related_project_id: Option<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGalleryImage {
    pub alt_text: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub related_project_id: Option<DbId>,
}
