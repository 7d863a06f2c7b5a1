//! Repository for the `projects` table.

use portico_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::project::{CreateProject, Project, Roster, UpdateProject};
use crate::repositories::ProjectTeamRepo;

const COLUMNS: &str = "id, title, client, location, picture, summary, coordinator, \
    total_floor_area, start_date, completed_date, job_sheets, certificate, category_id, \
    created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project with an already-stored `picture` path and link its
    /// leaders and team members, all in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        picture: Option<&str>,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO projects
                (title, client, location, picture, summary, coordinator, total_floor_area,
                 start_date, completed_date, job_sheets, certificate, category_id)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, 'Accra'), $4, COALESCE($5, ''),
                     COALESCE($6, ''), COALESCE($7, ''), $8, $9, COALESCE($10, ''),
                     COALESCE($11, ''), $12)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.client)
            .bind(&input.location)
            .bind(picture)
            .bind(&input.summary)
            .bind(&input.coordinator)
            .bind(&input.total_floor_area)
            .bind(input.start_date)
            .bind(input.completed_date)
            .bind(&input.job_sheets)
            .bind(&input.certificate)
            .bind(input.category_id)
            .fetch_one(&mut *tx)
            .await?;

        link_team(
            &mut tx,
            project.id,
            input.project_leader_ids.as_deref(),
            input.team_member_ids.as_deref(),
        )
        .await?;
        tx.commit().await?;
        Ok(project)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects, newest first, optionally restricted to one category
    /// slug.
    pub async fn list(
        pool: &PgPool,
        category_slug: Option<&str>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::TEXT IS NULL
                    OR category_id = (SELECT id FROM project_categories WHERE slug = $1))
             ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(category_slug)
            .fetch_all(pool)
            .await
    }

    /// Apply non-`None` fields of `input`; a `Some` picture replaces the
    /// stored path. `Some` id lists replace the linked people.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
        picture: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                client = COALESCE($3, client),
                location = COALESCE($4, location),
                picture = COALESCE($5, picture),
                summary = COALESCE($6, summary),
                coordinator = COALESCE($7, coordinator),
                total_floor_area = COALESCE($8, total_floor_area),
                start_date = COALESCE($9, start_date),
                completed_date = COALESCE($10, completed_date),
                job_sheets = COALESCE($11, job_sheets),
                certificate = COALESCE($12, certificate),
                category_id = COALESCE($13, category_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.client)
            .bind(&input.location)
            .bind(picture)
            .bind(&input.summary)
            .bind(&input.coordinator)
            .bind(&input.total_floor_area)
            .bind(input.start_date)
            .bind(input.completed_date)
            .bind(&input.job_sheets)
            .bind(&input.certificate)
            .bind(input.category_id)
            .fetch_optional(&mut *tx)
            .await?;

        if project.is_some() {
            link_team(
                &mut tx,
                id,
                input.project_leader_ids.as_deref(),
                input.team_member_ids.as_deref(),
            )
            .await?;
        }
        tx.commit().await?;
        Ok(project)
    }

    /// Delete a project together with its awards, images, contractors and
    /// team links.
    ///
    /// Returns the deleted row and the gallery image paths that went with it,
    /// collected inside the same transaction before the cascade.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<(Project, Vec<String>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let images: Vec<(String,)> =
            sqlx::query_as("SELECT image FROM project_images WHERE project_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let query = format!("DELETE FROM projects WHERE id = $1 RETURNING {COLUMNS}");
        let deleted = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted.map(|p| (p, images.into_iter().map(|(path,)| path).collect())))
    }
}

/// Replace the linked leaders and team members for each list that is given.
async fn link_team(
    tx: &mut Transaction<'_, Postgres>,
    project_id: DbId,
    leader_ids: Option<&[DbId]>,
    member_ids: Option<&[DbId]>,
) -> Result<(), sqlx::Error> {
    if let Some(ids) = leader_ids {
        ProjectTeamRepo::replace_for_project(tx, Roster::Leaders, project_id, ids).await?;
    }
    if let Some(ids) = member_ids {
        ProjectTeamRepo::replace_for_project(tx, Roster::TeamMembers, project_id, ids).await?;
    }
    Ok(())
}
