//! Repository for the `branches` table.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::branch::{Branch, CreateBranch, UpdateBranch};

const COLUMNS: &str = "id, name, address, phone, telephone, email, latitude, longitude, \
    created_at, updated_at";

pub struct BranchRepo;

impl BranchRepo {
    pub async fn create(pool: &PgPool, input: &CreateBranch) -> Result<Branch, sqlx::Error> {
        let query = format!(
            "INSERT INTO branches (name, address, phone, telephone, email, latitude, longitude)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''),
                     COALESCE($5, ''), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Branch>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.telephone)
            .bind(&input.email)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Branch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM branches WHERE id = $1");
        sqlx::query_as::<_, Branch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Branch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM branches ORDER BY name, id");
        sqlx::query_as::<_, Branch>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBranch,
    ) -> Result<Option<Branch>, sqlx::Error> {
        let query = format!(
            "UPDATE branches SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                telephone = COALESCE($5, telephone),
                email = COALESCE($6, email),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Branch>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.telephone)
            .bind(&input.email)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM branches WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
