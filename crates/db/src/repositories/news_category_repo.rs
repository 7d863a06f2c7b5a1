//! Repository for the `news_categories` table.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::news::{CreateNewsCategory, NewsCategory, UpdateNewsCategory};

const COLUMNS: &str = "id, name, slug, description, is_active, created_at, updated_at";

pub struct NewsCategoryRepo;

impl NewsCategoryRepo {
    /// Insert a category with a slug resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNewsCategory,
        slug: &str,
    ) -> Result<NewsCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO news_categories (name, slug, description, is_active)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsCategory>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NewsCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news_categories WHERE id = $1");
        sqlx::query_as::<_, NewsCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Categories shown publicly, alphabetically.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<NewsCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news_categories WHERE is_active ORDER BY name");
        sqlx::query_as::<_, NewsCategory>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNewsCategory,
    ) -> Result<Option<NewsCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE news_categories SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsCategory>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category; its articles become uncategorized.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM news_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
