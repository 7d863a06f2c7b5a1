//! Handlers for people profiles and board members.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use portico_core::error::CoreError;
use portico_core::storage::UploadDestination;
use portico_core::types::DbId;
use portico_core::validation::{limit_text, optional_url, require_text, NAME_LEN, SHORT_NAME_LEN};
use portico_db::models::board_member::{CreateBoardMember, UpdateBoardMember};
use portico_db::models::person::{CreatePerson, UpdatePerson};
use portico_db::repositories::{BoardMemberRepo, PersonRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{remove_blob, replace_blob, PendingBlobs, UploadForm};

const PROFILE_PICTURE_FIELD: &str = "profile_picture";
const IMAGE_FIELD: &str = "image";

/// Social links are optional but must be URLs when given.
fn validate_links(links: &[(&str, Option<&str>)]) -> Result<(), CoreError> {
    for (field, value) in links {
        if let Some(value) = value {
            optional_url(field, value)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

/// GET /api/v1/people
pub async fn list_people(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let people = PersonRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: people }))
}

/// POST /api/v1/admin/people (multipart: `payload`, optional `profile_picture`)
pub async fn create_person(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: CreatePerson = form.payload()?;
    require_text("name", &input.name, NAME_LEN)?;
    if let Some(department) = &input.department {
        limit_text("department", department, SHORT_NAME_LEN)?;
    }
    validate_links(&[
        ("facebook", input.facebook.as_deref()),
        ("twitter", input.twitter.as_deref()),
        ("linkedin", input.linkedin.as_deref()),
    ])?;

    let mut blobs = PendingBlobs::new(&state);
    let picture = blobs
        .store_optional_image(
            UploadDestination::ProfilePicture,
            form.take_file(PROFILE_PICTURE_FIELD),
        )
        .await?;

    let person = blobs
        .settle(PersonRepo::create(&state.pool, &input, picture.as_deref()).await)
        .await?;
    tracing::info!(person_id = person.id, "Person created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: person })))
}

/// PUT /api/v1/admin/people/{id}
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: UpdatePerson = form.payload_or_default()?;
    if let Some(name) = &input.name {
        require_text("name", name, NAME_LEN)?;
    }
    validate_links(&[
        ("facebook", input.facebook.as_deref()),
        ("twitter", input.twitter.as_deref()),
        ("linkedin", input.linkedin.as_deref()),
    ])?;

    let existing = PersonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Person", id }))?;

    let mut blobs = PendingBlobs::new(&state);
    let picture = blobs
        .store_optional_image(
            UploadDestination::ProfilePicture,
            form.take_file(PROFILE_PICTURE_FIELD),
        )
        .await?;

    let person = blobs
        .settle_optional(PersonRepo::update(&state.pool, id, &input, picture.as_deref()).await)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Person", id }))?;

    replace_blob(
        state.storage.as_ref(),
        existing.profile_picture.as_deref(),
        person.profile_picture.as_deref(),
    )
    .await;
    tracing::info!(person_id = id, "Person updated");

    Ok(Json(DataResponse { data: person }))
}

/// DELETE /api/v1/admin/people/{id}
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let person = PersonRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Person", id }))?;
    if let Some(picture) = &person.profile_picture {
        remove_blob(state.storage.as_ref(), picture).await;
    }
    tracing::info!(person_id = id, "Person deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Board members
// ---------------------------------------------------------------------------

/// GET /api/v1/board-members
///
/// Ordered by name.
pub async fn list_board(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let members = BoardMemberRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: members }))
}

/// GET /api/v1/board-members/{id}
pub async fn get_board_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = BoardMemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoardMember",
            id,
        }))?;
    Ok(Json(DataResponse { data: member }))
}

/// POST /api/v1/admin/board-members (multipart: `payload`, optional `image`)
///
/// Without an image the member gets the shared default picture.
pub async fn create_board_member(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: CreateBoardMember = form.payload()?;
    require_text("name", &input.name, NAME_LEN)?;
    if let Some(position) = &input.position {
        limit_text("position", position, NAME_LEN)?;
    }
    validate_links(&[
        ("linkedin", input.linkedin.as_deref()),
        ("twitter", input.twitter.as_deref()),
    ])?;

    let mut blobs = PendingBlobs::new(&state);
    let image = blobs
        .store_optional_image(UploadDestination::BoardMember, form.take_file(IMAGE_FIELD))
        .await?;

    let member = blobs
        .settle(BoardMemberRepo::create(&state.pool, &input, image.as_deref()).await)
        .await?;
    tracing::info!(board_member_id = member.id, "Board member created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// PUT /api/v1/admin/board-members/{id}
pub async fn update_board_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: UpdateBoardMember = form.payload_or_default()?;
    if let Some(name) = &input.name {
        require_text("name", name, NAME_LEN)?;
    }
    validate_links(&[
        ("linkedin", input.linkedin.as_deref()),
        ("twitter", input.twitter.as_deref()),
    ])?;

    let existing = BoardMemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoardMember",
            id,
        }))?;

    let mut blobs = PendingBlobs::new(&state);
    let image = blobs
        .store_optional_image(UploadDestination::BoardMember, form.take_file(IMAGE_FIELD))
        .await?;

    let member = blobs
        .settle_optional(BoardMemberRepo::update(&state.pool, id, &input, image.as_deref()).await)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoardMember",
            id,
        }))?;

    replace_blob(state.storage.as_ref(), Some(&existing.image), Some(&member.image)).await;
    tracing::info!(board_member_id = id, "Board member updated");

    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/admin/board-members/{id}
pub async fn delete_board_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let member = BoardMemberRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoardMember",
            id,
        }))?;
    remove_blob(state.storage.as_ref(), &member.image).await;
    tracing::info!(board_member_id = id, "Board member deleted");
    Ok(StatusCode::NO_CONTENT)
}
