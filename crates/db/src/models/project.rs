//! Projects and their children: awards, gallery images, contractors, and the
//! leaders and team members linked to them.

use portico_core::gallery::{ProjectGallery, ProjectImageType};
use portico_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::project_category::ProjectCategory;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub client: String,
    pub location: String,
    pub picture: Option<String>,
    pub summary: String,
    pub coordinator: String,
    pub total_floor_area: String,
    pub start_date: Date,
    pub completed_date: Option<Date>,
    pub job_sheets: String,
    pub certificate: String,
    pub category_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub client: Option<String>,
    /// Defaults to "Accra".
    pub location: Option<String>,
    pub summary: Option<String>,
    pub coordinator: Option<String>,
    pub total_floor_area: Option<String>,
    pub start_date: Date,
    pub completed_date: Option<Date>,
    pub job_sheets: Option<String>,
    pub certificate: Option<String>,
    pub category_id: Option<DbId>,
    /// Ids of [`Roster::Leaders`] rows to link.
    pub project_leader_ids: Option<Vec<DbId>>,
    /// Ids of [`Roster::TeamMembers`] rows to link.
    pub team_member_ids: Option<Vec<DbId>>,
}

/// DTO for updating a project.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub client: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub coordinator: Option<String>,
    pub total_floor_area: Option<String>,
    pub start_date: Option<Date>,
    pub completed_date: Option<Date>,
    pub job_sheets: Option<String>,
    pub certificate: Option<String>,
    pub category_id: Option<DbId>,
    /// `Some` replaces the linked leaders; an empty list unlinks them all.
    pub project_leader_ids: Option<Vec<DbId>>,
    pub team_member_ids: Option<Vec<DbId>>,
}

// ---------------------------------------------------------------------------
// Awards
// ---------------------------------------------------------------------------

/// A row from the `project_awards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectAward {
    pub id: DbId,
    pub project_id: DbId,
    pub year: i32,
    pub award_name: String,
    pub awarded_by: String,
    pub website: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectAward {
    pub year: i32,
    pub award_name: String,
    pub awarded_by: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectAward {
    pub year: Option<i32>,
    pub award_name: Option<String>,
    pub awarded_by: Option<String>,
    pub website: Option<String>,
}

// ---------------------------------------------------------------------------
// Gallery images
// ---------------------------------------------------------------------------

/// A row from the `project_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectImage {
    pub id: DbId,
    pub project_id: DbId,
    pub image: String,
    pub image_type: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectImage {
    /// Parsed discriminator. The column CHECK keeps it in the vocabulary, so
    /// anything else falls back to the plain project bucket.
    pub fn kind(&self) -> ProjectImageType {
        ProjectImageType::from_name(&self.image_type).unwrap_or(ProjectImageType::Project)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateProjectImage {
    /// Defaults to `project`.
    pub image_type: Option<ProjectImageType>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectImage {
    pub image_type: Option<ProjectImageType>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Contractors
// ---------------------------------------------------------------------------

/// A row from the `contractor_roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractorRole {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateContractorRole {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContractorRole {
    pub name: Option<String>,
}

/// A `project_contractors` row joined with its role name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectContractor {
    pub id: DbId,
    pub project_id: DbId,
    pub role_id: DbId,
    pub role_name: String,
    pub company_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectContractor {
    pub role_id: DbId,
    pub company_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectContractor {
    pub role_id: Option<DbId>,
    pub company_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Leaders and team members
// ---------------------------------------------------------------------------

/// The two people lists a project links to. Both hold the same row shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roster {
    Leaders,
    TeamMembers,
}

impl Roster {
    pub fn table(self) -> &'static str {
        match self {
            Self::Leaders => "project_leaders",
            Self::TeamMembers => "project_team_members",
        }
    }

    /// Join table between `projects` and [`table`](Self::table).
    pub fn link_table(self) -> &'static str {
        match self {
            Self::Leaders => "project_leader_links",
            Self::TeamMembers => "project_team_member_links",
        }
    }

    /// Entity name used in not-found errors and logs.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Leaders => "ProjectLeader",
            Self::TeamMembers => "ProjectTeamMember",
        }
    }
}

/// A row from `project_leaders` or `project_team_members`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectPerson {
    pub id: DbId,
    pub full_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectPerson {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectPerson {
    pub full_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Detail view
// ---------------------------------------------------------------------------

/// A project with everything its detail page shows.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub category: Option<ProjectCategory>,
    pub awards: Vec<ProjectAward>,
    pub contractors: Vec<ProjectContractor>,
    pub project_leaders: Vec<ProjectPerson>,
    pub other_team_members: Vec<ProjectPerson>,
    /// Active images only, bucketed by type.
    pub gallery: ProjectGallery<ProjectImage>,
}
