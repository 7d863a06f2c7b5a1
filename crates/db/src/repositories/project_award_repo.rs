//! Repository for the `project_awards` table.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProjectAward, ProjectAward, UpdateProjectAward};

const COLUMNS: &str =
    "id, project_id, year, award_name, awarded_by, website, created_at, updated_at";

pub struct ProjectAwardRepo;

impl ProjectAwardRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateProjectAward,
    ) -> Result<ProjectAward, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_awards (project_id, year, award_name, awarded_by, website)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectAward>(&query)
            .bind(project_id)
            .bind(input.year)
            .bind(&input.award_name)
            .bind(&input.awarded_by)
            .bind(&input.website)
            .fetch_one(pool)
            .await
    }

    /// Awards of a project, most recent year first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectAward>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_awards
             WHERE project_id = $1
             ORDER BY year DESC, award_name"
        );
        sqlx::query_as::<_, ProjectAward>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectAward,
    ) -> Result<Option<ProjectAward>, sqlx::Error> {
        let query = format!(
            "UPDATE project_awards SET
                year = COALESCE($2, year),
                award_name = COALESCE($3, award_name),
                awarded_by = COALESCE($4, awarded_by),
                website = COALESCE($5, website)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectAward>(&query)
            .bind(id)
            .bind(input.year)
            .bind(&input.award_name)
            .bind(&input.awarded_by)
            .bind(&input.website)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_awards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
