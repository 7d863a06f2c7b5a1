//! Repository for the `news_images` table.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::news::{CreateNewsImage, NewsImage, UpdateNewsImage};

const COLUMNS: &str = "id, article_id, image, caption, sort_order, created_at, updated_at";

pub struct NewsImageRepo;

impl NewsImageRepo {
    pub async fn create(
        pool: &PgPool,
        article_id: DbId,
        input: &CreateNewsImage,
        image: &str,
    ) -> Result<NewsImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO news_images (article_id, image, caption, sort_order)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsImage>(&query)
            .bind(article_id)
            .bind(image)
            .bind(&input.caption)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NewsImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news_images WHERE id = $1");
        sqlx::query_as::<_, NewsImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<NewsImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news_images
             WHERE article_id = $1
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, NewsImage>(&query)
            .bind(article_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNewsImage,
        image: Option<&str>,
    ) -> Result<Option<NewsImage>, sqlx::Error> {
        let query = format!(
            "UPDATE news_images SET
                image = COALESCE($2, image),
                caption = COALESCE($3, caption),
                sort_order = COALESCE($4, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsImage>(&query)
            .bind(id)
            .bind(image)
            .bind(&input.caption)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<NewsImage>, sqlx::Error> {
        let query = format!("DELETE FROM news_images WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, NewsImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
