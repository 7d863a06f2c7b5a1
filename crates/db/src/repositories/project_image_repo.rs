//! Repository for the `project_images` table.

use portico_core::gallery::ProjectImageType;
use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProjectImage, ProjectImage, UpdateProjectImage};

const COLUMNS: &str = "id, project_id, image, image_type, is_active, created_at, updated_at";

pub struct ProjectImageRepo;

impl ProjectImageRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateProjectImage,
        image: &str,
    ) -> Result<ProjectImage, sqlx::Error> {
        let image_type = input.image_type.unwrap_or(ProjectImageType::Project);
        let query = format!(
            "INSERT INTO project_images (project_id, image, image_type, is_active)
             VALUES ($1, $2, $3, COALESCE($4, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(project_id)
            .bind(image)
            .bind(image_type.name())
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_images WHERE id = $1");
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Images of a project in upload order. Inactive images are included
    /// only when `include_inactive` is set.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<ProjectImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_images
             WHERE project_id = $1 AND ($2 OR is_active)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(project_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectImage,
        image: Option<&str>,
    ) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!(
            "UPDATE project_images SET
                image = COALESCE($2, image),
                image_type = COALESCE($3, image_type),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(id)
            .bind(image)
            .bind(input.image_type.map(ProjectImageType::name))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!("DELETE FROM project_images WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
