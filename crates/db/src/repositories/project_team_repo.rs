//! Repository for `project_leaders` / `project_team_members` and their links
//! to projects.
//!
//! Both tables share one row shape, so every method takes the [`Roster`] it
//! works on. Table names come from that closed enum, never from input.

use portico_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::project::{ProjectPerson, Roster, UpdateProjectPerson};

const COLUMNS: &str = "id, full_name, created_at, updated_at";

pub struct ProjectTeamRepo;

impl ProjectTeamRepo {
    pub async fn create(
        pool: &PgPool,
        roster: Roster,
        full_name: &str,
    ) -> Result<ProjectPerson, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (full_name) VALUES ($1) RETURNING {COLUMNS}",
            roster.table()
        );
        sqlx::query_as::<_, ProjectPerson>(&query)
            .bind(full_name)
            .fetch_one(pool)
            .await
    }

    /// People on `roster` ordered by name. `pattern` is an `ILIKE` pattern
    /// on `full_name`.
    pub async fn list(
        pool: &PgPool,
        roster: Roster,
        pattern: Option<&str>,
    ) -> Result<Vec<ProjectPerson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {}
             WHERE ($1::TEXT IS NULL OR full_name ILIKE $1)
             ORDER BY full_name, id",
            roster.table()
        );
        sqlx::query_as::<_, ProjectPerson>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        roster: Roster,
        id: DbId,
        input: &UpdateProjectPerson,
    ) -> Result<Option<ProjectPerson>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET full_name = COALESCE($2, full_name)
             WHERE id = $1
             RETURNING {COLUMNS}",
            roster.table()
        );
        sqlx::query_as::<_, ProjectPerson>(&query)
            .bind(id)
            .bind(&input.full_name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a person. Their links to projects go with them; the projects
    /// stay.
    pub async fn delete(pool: &PgPool, roster: Roster, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", roster.table());
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// People on `roster` linked to a project, ordered by name.
    pub async fn list_for_project(
        pool: &PgPool,
        roster: Roster,
        project_id: DbId,
    ) -> Result<Vec<ProjectPerson>, sqlx::Error> {
        let query = format!(
            "SELECT p.id, p.full_name, p.created_at, p.updated_at
             FROM {table} p
             JOIN {links} l ON l.person_id = p.id
             WHERE l.project_id = $1
             ORDER BY p.full_name, p.id",
            table = roster.table(),
            links = roster.link_table(),
        );
        sqlx::query_as::<_, ProjectPerson>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Make `ids` the exact set of people on `roster` linked to a project,
    /// within the caller's transaction. Repeated ids are linked once; an
    /// unknown id fails with a foreign key violation.
    pub async fn replace_for_project(
        tx: &mut Transaction<'_, Postgres>,
        roster: Roster,
        project_id: DbId,
        ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let links = roster.link_table();

        sqlx::query(&format!("DELETE FROM {links} WHERE project_id = $1"))
            .bind(project_id)
            .execute(&mut **tx)
            .await?;

        if ids.is_empty() {
            return Ok(());
        }
        let query = format!(
            "INSERT INTO {links} (project_id, person_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING"
        );
        sqlx::query(&query)
            .bind(project_id)
            .bind(ids)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
