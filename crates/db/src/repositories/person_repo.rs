//! Repository for the `people` table.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::person::{CreatePerson, Person, UpdatePerson};

const COLUMNS: &str = "id, name, profile_picture, profession, department, facebook, twitter, \
    linkedin, created_at, updated_at";

pub struct PersonRepo;

impl PersonRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePerson,
        profile_picture: Option<&str>,
    ) -> Result<Person, sqlx::Error> {
        let query = format!(
            "INSERT INTO people
                (name, profile_picture, profession, department, facebook, twitter, linkedin)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, 'tech'), COALESCE($5, ''),
                     COALESCE($6, ''), COALESCE($7, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(&input.name)
            .bind(profile_picture)
            .bind(&input.profession)
            .bind(&input.department)
            .bind(&input.facebook)
            .bind(&input.twitter)
            .bind(&input.linkedin)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM people WHERE id = $1");
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM people ORDER BY name, id");
        sqlx::query_as::<_, Person>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePerson,
        profile_picture: Option<&str>,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!(
            "UPDATE people SET
                name = COALESCE($2, name),
                profile_picture = COALESCE($3, profile_picture),
                profession = COALESCE($4, profession),
                department = COALESCE($5, department),
                facebook = COALESCE($6, facebook),
                twitter = COALESCE($7, twitter),
                linkedin = COALESCE($8, linkedin)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(profile_picture)
            .bind(&input.profession)
            .bind(&input.department)
            .bind(&input.facebook)
            .bind(&input.twitter)
            .bind(&input.linkedin)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("DELETE FROM people WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
