//! Repository for the `gallery_images` table.

use portico_core::gallery::GalleryCategory;
use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::gallery_image::{CreateGalleryImage, GalleryImage, UpdateGalleryImage};

const COLUMNS: &str = "id, image, alt_text, category, is_active, related_project_id, \
    created_at, updated_at";

pub struct GalleryImageRepo;

impl GalleryImageRepo {
    /// Insert a gallery image. `category` has already been checked against
    /// the vocabulary.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGalleryImage,
        category: GalleryCategory,
        image: &str,
    ) -> Result<GalleryImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO gallery_images (image, alt_text, category, is_active, related_project_id)
             VALUES ($1, COALESCE($2, ''), $3, COALESCE($4, TRUE), $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(image)
            .bind(&input.alt_text)
            .bind(category.name())
            .bind(input.is_active)
            .bind(input.related_project_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GalleryImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gallery_images WHERE id = $1");
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active images, newest first, optionally limited to one category.
    pub async fn list_active(
        pool: &PgPool,
        category: Option<GalleryCategory>,
    ) -> Result<Vec<GalleryImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gallery_images
             WHERE is_active AND ($1::TEXT IS NULL OR category = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(category.map(GalleryCategory::name))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGalleryImage,
        category: Option<GalleryCategory>,
        image: Option<&str>,
    ) -> Result<Option<GalleryImage>, sqlx::Error> {
        let query = format!(
            "UPDATE gallery_images SET
                image = COALESCE($2, image),
                alt_text = COALESCE($3, alt_text),
                category = COALESCE($4, category),
                is_active = COALESCE($5, is_active),
                related_project_id = COALESCE($6, related_project_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(id)
            .bind(image)
            .bind(&input.alt_text)
            .bind(category.map(GalleryCategory::name))
            .bind(input.is_active)
            .bind(input.related_project_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<GalleryImage>, sqlx::Error> {
        let query = format!("DELETE FROM gallery_images WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
