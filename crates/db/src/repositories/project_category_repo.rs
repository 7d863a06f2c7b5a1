//! Repository for the `project_categories` table.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::project_category::{ProjectCategory, UpdateProjectCategory};

const COLUMNS: &str = "id, name, slug, created_at, updated_at";

pub struct ProjectCategoryRepo;

impl ProjectCategoryRepo {
    /// Insert a category. The slug is resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        slug: &str,
    ) -> Result<ProjectCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_categories (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectCategory>(&query)
            .bind(name)
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_categories WHERE id = $1");
        sqlx::query_as::<_, ProjectCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<ProjectCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_categories WHERE slug = $1");
        sqlx::query_as::<_, ProjectCategory>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// All categories, alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_categories ORDER BY name");
        sqlx::query_as::<_, ProjectCategory>(&query)
            .fetch_all(pool)
            .await
    }

    /// Rename a category. The slug column is never touched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectCategory,
    ) -> Result<Option<ProjectCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE project_categories SET name = COALESCE($2, name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectCategory>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Its projects keep existing with `category_id` NULL.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
