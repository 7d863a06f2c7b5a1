//! Handlers for projects and everything hanging off them: categories,
//! awards, gallery images, contractor roles, contractors, leaders and team
//! members.
//!
//! Public reads live under `/projects` and `/project-categories`; writes
//! under `/admin/...`. Project pictures and gallery images go through the
//! upload pipeline in [`crate::uploads`].

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use portico_core::error::CoreError;
use portico_core::gallery::ProjectGallery;
use portico_core::search::contains_pattern;
use portico_core::slug::resolve_new_slug;
use portico_core::storage::UploadDestination;
use portico_core::types::DbId;
use portico_core::validation::{
    limit_text, optional_url, require_text, NAME_LEN, SHORT_NAME_LEN,
};
use portico_db::models::project::{
    CreateContractorRole, CreateProject, CreateProjectAward, CreateProjectContractor,
    CreateProjectImage, CreateProjectPerson, ProjectDetail, Roster, UpdateContractorRole,
    UpdateProject, UpdateProjectAward, UpdateProjectContractor, UpdateProjectImage,
    UpdateProjectPerson,
};
use portico_db::models::project_category::{CreateProjectCategory, UpdateProjectCategory};
use portico_db::repositories::{
    ContractorRoleRepo, ProjectAwardRepo, ProjectCategoryRepo, ProjectContractorRepo,
    ProjectImageRepo, ProjectRepo, ProjectTeamRepo,
};

use crate::error::{AppError, AppResult};
use crate::query::{IncludeInactiveParams, NameSearchParams, ProjectListParams};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{remove_blob, remove_blobs, replace_blob, PendingBlobs, UploadForm};

/// Multipart file part carrying a project's main picture.
const PICTURE_FIELD: &str = "picture";

/// Multipart file part carrying a gallery image.
const IMAGE_FIELD: &str = "image";

/// Longest leader or team member name.
const PERSON_NAME_LEN: usize = 150;

async fn ensure_project(state: &AppState, id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/project-categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = ProjectCategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/admin/project-categories
///
/// The slug is taken from the request or derived from the name, once.
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectCategory>,
) -> AppResult<impl IntoResponse> {
    require_text("name", &input.name, SHORT_NAME_LEN)?;
    let slug = resolve_new_slug(input.slug.as_deref(), &input.name)?;

    let category = ProjectCategoryRepo::create(&state.pool, input.name.trim(), &slug).await?;
    tracing::info!(category_id = category.id, slug = %category.slug, "Project category created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/admin/project-categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_text("name", name, SHORT_NAME_LEN)?;
    }
    let category = ProjectCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectCategory",
            id,
        }))?;
    tracing::info!(category_id = id, "Project category updated");
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/admin/project-categories/{id}
///
/// Projects in the category stay, uncategorized.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectCategoryRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectCategory",
            id,
        }));
    }
    tracing::info!(category_id = id, "Project category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

fn validate_create(input: &CreateProject) -> Result<(), CoreError> {
    require_text("title", &input.title, NAME_LEN)?;
    if let Some(client) = &input.client {
        limit_text("client", client, NAME_LEN)?;
    }
    if let Some(location) = &input.location {
        limit_text("location", location, NAME_LEN)?;
    }
    if let Some(completed) = input.completed_date {
        if completed < input.start_date {
            return Err(CoreError::Validation(
                "completed_date must not be before start_date".into(),
            ));
        }
    }
    Ok(())
}

fn validate_update(input: &UpdateProject) -> Result<(), CoreError> {
    if let Some(title) = &input.title {
        require_text("title", title, NAME_LEN)?;
    }
    if let (Some(start), Some(completed)) = (input.start_date, input.completed_date) {
        if completed < start {
            return Err(CoreError::Validation(
                "completed_date must not be before start_date".into(),
            ));
        }
    }
    Ok(())
}

/// GET /api/v1/projects?category=<slug>
///
/// Newest `start_date` first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<impl IntoResponse> {
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let projects = ProjectRepo::list(&state.pool, category).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
///
/// The project with its category, awards, contractors, leaders, team members
/// and active gallery split into display buckets.
pub async fn get_detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let category = match project.category_id {
        Some(category_id) => ProjectCategoryRepo::find_by_id(&state.pool, category_id).await?,
        None => None,
    };
    let awards = ProjectAwardRepo::list_for_project(&state.pool, id).await?;
    let contractors = ProjectContractorRepo::list_for_project(&state.pool, id).await?;
    let project_leaders = ProjectTeamRepo::list_for_project(&state.pool, Roster::Leaders, id).await?;
    let other_team_members =
        ProjectTeamRepo::list_for_project(&state.pool, Roster::TeamMembers, id).await?;
    let images = ProjectImageRepo::list_for_project(&state.pool, id, false).await?;

    let detail = ProjectDetail {
        project,
        category,
        awards,
        contractors,
        project_leaders,
        other_team_members,
        gallery: ProjectGallery::partition(images, |img| img.kind()),
    };
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/admin/projects (multipart: `payload`, optional `picture`)
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: CreateProject = form.payload()?;
    validate_create(&input)?;

    let mut blobs = PendingBlobs::new(&state);
    let picture = blobs
        .store_optional_image(UploadDestination::ProjectPicture, form.take_file(PICTURE_FIELD))
        .await?;

    let project = blobs
        .settle(ProjectRepo::create(&state.pool, &input, picture.as_deref()).await)
        .await?;
    tracing::info!(project_id = project.id, title = %project.title, "Project created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PUT /api/v1/admin/projects/{id} (multipart: optional `payload`, optional `picture`)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: UpdateProject = form.payload_or_default()?;
    validate_update(&input)?;

    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let mut blobs = PendingBlobs::new(&state);
    let picture = blobs
        .store_optional_image(UploadDestination::ProjectPicture, form.take_file(PICTURE_FIELD))
        .await?;

    let project = blobs
        .settle_optional(ProjectRepo::update(&state.pool, id, &input, picture.as_deref()).await)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    replace_blob(
        state.storage.as_ref(),
        existing.picture.as_deref(),
        project.picture.as_deref(),
    )
    .await;
    tracing::info!(project_id = id, "Project updated");

    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/admin/projects/{id}
///
/// Awards, contractors and gallery images go with the project; their files
/// are removed after the rows.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (project, gallery) = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    if let Some(picture) = &project.picture {
        remove_blob(state.storage.as_ref(), picture).await;
    }
    remove_blobs(state.storage.as_ref(), &gallery).await;
    tracing::info!(project_id = id, images = gallery.len(), "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Awards
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/projects/{id}/awards
pub async fn create_award(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateProjectAward>,
) -> AppResult<impl IntoResponse> {
    require_text("award_name", &input.award_name, NAME_LEN)?;
    if let Some(website) = &input.website {
        optional_url("website", website)?;
    }
    ensure_project(&state, project_id).await?;

    let award = ProjectAwardRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(project_id, award_id = award.id, "Project award created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: award })))
}

/// PUT /api/v1/admin/awards/{id}
pub async fn update_award(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectAward>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.award_name {
        require_text("award_name", name, NAME_LEN)?;
    }
    if let Some(website) = &input.website {
        optional_url("website", website)?;
    }
    let award = ProjectAwardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectAward",
            id,
        }))?;
    tracing::info!(award_id = id, "Project award updated");
    Ok(Json(DataResponse { data: award }))
}

/// DELETE /api/v1/admin/awards/{id}
pub async fn delete_award(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ProjectAwardRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectAward",
            id,
        }));
    }
    tracing::info!(award_id = id, "Project award deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Gallery images
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/projects/{id}/images?include_inactive=true
pub async fn list_images(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    ensure_project(&state, project_id).await?;
    let images =
        ProjectImageRepo::list_for_project(&state.pool, project_id, params.include_inactive)
            .await?;
    Ok(Json(DataResponse { data: images }))
}

/// POST /api/v1/admin/projects/{id}/images (multipart: optional
/// `payload`, required `image`)
pub async fn create_image(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: CreateProjectImage = form.payload_or_default()?;
    let file = form.require_file(IMAGE_FIELD)?;
    ensure_project(&state, project_id).await?;

    let mut blobs = PendingBlobs::new(&state);
    let path = blobs
        .store_image(UploadDestination::ProjectGallery, file)
        .await?;

    let image = blobs
        .settle(ProjectImageRepo::create(&state.pool, project_id, &input, &path).await)
        .await?;
    tracing::info!(project_id, image_id = image.id, image_type = %image.image_type, "Project image created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: image })))
}

/// PUT /api/v1/admin/project-images/{id} (multipart: optional `payload`,
/// optional `image`)
pub async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: UpdateProjectImage = form.payload_or_default()?;

    let existing = ProjectImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectImage",
            id,
        }))?;

    let mut blobs = PendingBlobs::new(&state);
    let path = blobs
        .store_optional_image(UploadDestination::ProjectGallery, form.take_file(IMAGE_FIELD))
        .await?;

    let image = blobs
        .settle_optional(ProjectImageRepo::update(&state.pool, id, &input, path.as_deref()).await)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectImage",
            id,
        }))?;

    replace_blob(state.storage.as_ref(), Some(&existing.image), Some(&image.image)).await;
    tracing::info!(image_id = id, "Project image updated");

    Ok(Json(DataResponse { data: image }))
}

/// DELETE /api/v1/admin/project-images/{id}
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let image = ProjectImageRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectImage",
            id,
        }))?;
    remove_blob(state.storage.as_ref(), &image.image).await;
    tracing::info!(image_id = id, project_id = image.project_id, "Project image deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Contractor roles
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/contractor-roles
pub async fn list_roles(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let roles = ContractorRoleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: roles }))
}

/// POST /api/v1/admin/contractor-roles
pub async fn create_role(
    State(state): State<AppState>,
    Json(input): Json<CreateContractorRole>,
) -> AppResult<impl IntoResponse> {
    require_text("name", &input.name, SHORT_NAME_LEN)?;
    let role = ContractorRoleRepo::create(&state.pool, input.name.trim()).await?;
    tracing::info!(role_id = role.id, name = %role.name, "Contractor role created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: role })))
}

/// PUT /api/v1/admin/contractor-roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContractorRole>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_text("name", name, SHORT_NAME_LEN)?;
    }
    let role = ContractorRoleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ContractorRole",
            id,
        }))?;
    tracing::info!(role_id = id, "Contractor role updated");
    Ok(Json(DataResponse { data: role }))
}

/// DELETE /api/v1/admin/contractor-roles/{id}
///
/// Refused with 409 while any project contractor still uses the role.
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ContractorRoleRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ContractorRole",
            id,
        }));
    }
    tracing::info!(role_id = id, "Contractor role deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Leaders and team members
// ---------------------------------------------------------------------------

async fn list_people(
    state: &AppState,
    roster: Roster,
    params: NameSearchParams,
) -> AppResult<impl IntoResponse> {
    let pattern = contains_pattern(params.search.as_deref());
    let people = ProjectTeamRepo::list(&state.pool, roster, pattern.as_deref()).await?;
    Ok(Json(DataResponse { data: people }))
}

async fn create_person(
    state: &AppState,
    roster: Roster,
    input: CreateProjectPerson,
) -> AppResult<impl IntoResponse> {
    require_text("full_name", &input.full_name, PERSON_NAME_LEN)?;
    let person = ProjectTeamRepo::create(&state.pool, roster, input.full_name.trim()).await?;
    tracing::info!(entity = roster.entity(), person_id = person.id, "Project person created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: person })))
}

async fn update_person(
    state: &AppState,
    roster: Roster,
    id: DbId,
    input: UpdateProjectPerson,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.full_name {
        require_text("full_name", name, PERSON_NAME_LEN)?;
    }
    let person = ProjectTeamRepo::update(&state.pool, roster, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: roster.entity(),
            id,
        }))?;
    tracing::info!(entity = roster.entity(), person_id = id, "Project person updated");
    Ok(Json(DataResponse { data: person }))
}

async fn delete_person(state: &AppState, roster: Roster, id: DbId) -> AppResult<StatusCode> {
    if !ProjectTeamRepo::delete(&state.pool, roster, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: roster.entity(),
            id,
        }));
    }
    tracing::info!(entity = roster.entity(), person_id = id, "Project person deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/project-leaders?search=<text>
pub async fn list_leaders(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> AppResult<impl IntoResponse> {
    list_people(&state, Roster::Leaders, params).await
}

/// POST /api/v1/admin/project-leaders
pub async fn create_leader(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectPerson>,
) -> AppResult<impl IntoResponse> {
    create_person(&state, Roster::Leaders, input).await
}

/// PUT /api/v1/admin/project-leaders/{id}
pub async fn update_leader(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectPerson>,
) -> AppResult<impl IntoResponse> {
    update_person(&state, Roster::Leaders, id, input).await
}

/// DELETE /api/v1/admin/project-leaders/{id}
///
/// Unlinks the leader from every project; the projects stay.
pub async fn delete_leader(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_person(&state, Roster::Leaders, id).await
}

/// GET /api/v1/admin/project-team-members?search=<text>
pub async fn list_team_members(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> AppResult<impl IntoResponse> {
    list_people(&state, Roster::TeamMembers, params).await
}

/// POST /api/v1/admin/project-team-members
pub async fn create_team_member(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectPerson>,
) -> AppResult<impl IntoResponse> {
    create_person(&state, Roster::TeamMembers, input).await
}

/// PUT /api/v1/admin/project-team-members/{id}
pub async fn update_team_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectPerson>,
) -> AppResult<impl IntoResponse> {
    update_person(&state, Roster::TeamMembers, id, input).await
}

/// DELETE /api/v1/admin/project-team-members/{id}
pub async fn delete_team_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_person(&state, Roster::TeamMembers, id).await
}

// ---------------------------------------------------------------------------
// Contractors
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/projects/{id}/contractors
///
/// One contractor per role per project; a second one is a 409.
pub async fn create_contractor(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateProjectContractor>,
) -> AppResult<impl IntoResponse> {
    require_text("company_name", &input.company_name, NAME_LEN)?;
    ensure_project(&state, project_id).await?;

    let contractor = ProjectContractorRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(
        project_id,
        contractor_id = contractor.id,
        role = %contractor.role_name,
        "Project contractor created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: contractor })))
}

/// PUT /api/v1/admin/contractors/{id}
pub async fn update_contractor(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectContractor>,
) -> AppResult<impl IntoResponse> {
    if let Some(company) = &input.company_name {
        require_text("company_name", company, NAME_LEN)?;
    }
    let contractor = ProjectContractorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectContractor",
            id,
        }))?;
    tracing::info!(contractor_id = id, "Project contractor updated");
    Ok(Json(DataResponse { data: contractor }))
}

/// DELETE /api/v1/admin/contractors/{id}
pub async fn delete_contractor(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ProjectContractorRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectContractor",
            id,
        }));
    }
    tracing::info!(contractor_id = id, "Project contractor deleted");
    Ok(StatusCode::NO_CONTENT)
}
