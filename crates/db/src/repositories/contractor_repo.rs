//! Repositories for `contractor_roles` and `project_contractors`.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{
    ContractorRole, CreateProjectContractor, ProjectContractor, UpdateContractorRole,
    UpdateProjectContractor,
};

const ROLE_COLUMNS: &str = "id, name, created_at, updated_at";

/// Joined column list; every query aliases `project_contractors` as `pc`.
const CONTRACTOR_COLUMNS: &str = "pc.id, pc.project_id, pc.role_id, r.name AS role_name, \
    pc.company_name, pc.created_at, pc.updated_at";

pub struct ContractorRoleRepo;

impl ContractorRoleRepo {
    pub async fn create(pool: &PgPool, name: &str) -> Result<ContractorRole, sqlx::Error> {
        let query =
            format!("INSERT INTO contractor_roles (name) VALUES ($1) RETURNING {ROLE_COLUMNS}");
        sqlx::query_as::<_, ContractorRole>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ContractorRole>, sqlx::Error> {
        let query = format!("SELECT {ROLE_COLUMNS} FROM contractor_roles ORDER BY name");
        sqlx::query_as::<_, ContractorRole>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContractorRole,
    ) -> Result<Option<ContractorRole>, sqlx::Error> {
        let query = format!(
            "UPDATE contractor_roles SET name = COALESCE($2, name)
             WHERE id = $1
             RETURNING {ROLE_COLUMNS}"
        );
        sqlx::query_as::<_, ContractorRole>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a role. Fails with a foreign key violation while any project
    /// contractor still references it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contractor_roles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct ProjectContractorRepo;

impl ProjectContractorRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateProjectContractor,
    ) -> Result<ProjectContractor, sqlx::Error> {
        let query = format!(
            "WITH pc AS (
                INSERT INTO project_contractors (project_id, role_id, company_name)
                VALUES ($1, $2, $3)
                RETURNING *
             )
             SELECT {CONTRACTOR_COLUMNS} FROM pc JOIN contractor_roles r ON r.id = pc.role_id"
        );
        sqlx::query_as::<_, ProjectContractor>(&query)
            .bind(project_id)
            .bind(input.role_id)
            .bind(&input.company_name)
            .fetch_one(pool)
            .await
    }

    /// Contractors of a project ordered by role name.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectContractor>, sqlx::Error> {
        let query = format!(
            "SELECT {CONTRACTOR_COLUMNS}
             FROM project_contractors pc
             JOIN contractor_roles r ON r.id = pc.role_id
             WHERE pc.project_id = $1
             ORDER BY r.name"
        );
        sqlx::query_as::<_, ProjectContractor>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectContractor,
    ) -> Result<Option<ProjectContractor>, sqlx::Error> {
        let query = format!(
            "WITH pc AS (
                UPDATE project_contractors SET
                    role_id = COALESCE($2, role_id),
                    company_name = COALESCE($3, company_name)
                WHERE id = $1
                RETURNING *
             )
             SELECT {CONTRACTOR_COLUMNS} FROM pc JOIN contractor_roles r ON r.id = pc.role_id"
        );
        sqlx::query_as::<_, ProjectContractor>(&query)
            .bind(id)
            .bind(input.role_id)
            .bind(&input.company_name)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_contractors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
