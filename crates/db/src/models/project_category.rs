//! Project categories (Roads, Health, Education, ...).

use portico_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectCategory {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project category.
#[derive(Debug, Deserialize)]
pub struct CreateProjectCategory {
    pub name: String,
    /// Derived from `name` if `None`.
    pub slug: Option<String>,
}

/// DTO for renaming a project category. The slug is fixed at creation.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectCategory {
    pub name: Option<String>,
}
