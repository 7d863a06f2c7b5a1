//! Handlers for branch offices.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use portico_core::error::CoreError;
use portico_core::types::DbId;
use portico_core::validation::{
    limit_text, optional_email, require_text, validate_coordinates, NAME_LEN,
};
use portico_db::models::branch::{CreateBranch, UpdateBranch};
use portico_db::repositories::BranchRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_contact(
    phone: Option<&str>,
    telephone: Option<&str>,
    email: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(phone) = phone {
        limit_text("phone", phone, 50)?;
    }
    if let Some(telephone) = telephone {
        limit_text("telephone", telephone, 50)?;
    }
    if let Some(email) = email {
        optional_email("email", email)?;
    }
    Ok(())
}

/// GET /api/v1/branches
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let branches = BranchRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: branches }))
}

/// POST /api/v1/admin/branches
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBranch>,
) -> AppResult<impl IntoResponse> {
    require_text("name", &input.name, NAME_LEN)?;
    validate_contact(
        input.phone.as_deref(),
        input.telephone.as_deref(),
        input.email.as_deref(),
    )?;
    validate_coordinates(input.latitude, input.longitude)?;

    let branch = BranchRepo::create(&state.pool, &input).await?;
    tracing::info!(branch_id = branch.id, name = %branch.name, "Branch created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: branch })))
}

/// PUT /api/v1/admin/branches/{id}
///
/// Coordinates are checked as the pair the row will hold after the update.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBranch>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_text("name", name, NAME_LEN)?;
    }
    validate_contact(
        input.phone.as_deref(),
        input.telephone.as_deref(),
        input.email.as_deref(),
    )?;

    let existing = BranchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Branch", id }))?;
    validate_coordinates(
        input.latitude.or(existing.latitude),
        input.longitude.or(existing.longitude),
    )?;

    let branch = BranchRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Branch", id }))?;
    tracing::info!(branch_id = id, "Branch updated");
    Ok(Json(DataResponse { data: branch }))
}

/// DELETE /api/v1/admin/branches/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !BranchRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Branch", id }));
    }
    tracing::info!(branch_id = id, "Branch deleted");
    Ok(StatusCode::NO_CONTENT)
}
