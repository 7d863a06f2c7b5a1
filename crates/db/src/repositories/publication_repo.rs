//! Repository for the `publications` table.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::publication::{CreatePublication, Publication, UpdatePublication};

const COLUMNS: &str =
    "id, title, publication_type, author, document, cover_image, created_at, updated_at";

pub struct PublicationRepo;

impl PublicationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePublication,
        document: Option<&str>,
        cover_image: Option<&str>,
    ) -> Result<Publication, sqlx::Error> {
        let query = format!(
            "INSERT INTO publications (title, publication_type, author, document, cover_image)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Publication>(&query)
            .bind(&input.title)
            .bind(&input.publication_type)
            .bind(&input.author)
            .bind(document)
            .bind(cover_image)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Publication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM publications WHERE id = $1");
        sqlx::query_as::<_, Publication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List publications, newest first. `type_pattern` is an `ILIKE` prefix
    /// pattern (see `portico_core::documents::type_prefix_pattern`).
    pub async fn list(
        pool: &PgPool,
        type_pattern: Option<&str>,
    ) -> Result<Vec<Publication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM publications
             WHERE ($1::TEXT IS NULL OR publication_type ILIKE $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Publication>(&query)
            .bind(type_pattern)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePublication,
        document: Option<&str>,
        cover_image: Option<&str>,
    ) -> Result<Option<Publication>, sqlx::Error> {
        let query = format!(
            "UPDATE publications SET
                title = COALESCE($2, title),
                publication_type = COALESCE($3, publication_type),
                author = COALESCE($4, author),
                document = COALESCE($5, document),
                cover_image = COALESCE($6, cover_image)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Publication>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.publication_type)
            .bind(&input.author)
            .bind(document)
            .bind(cover_image)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Publication>, sqlx::Error> {
        let query = format!("DELETE FROM publications WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Publication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
