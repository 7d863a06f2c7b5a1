//! Handlers for the management structure: main categories, sub categories
//! and the staff members under them.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use portico_core::error::CoreError;
use portico_core::storage::UploadDestination;
use portico_core::types::DbId;
use portico_core::validation::{limit_text, require_email, require_text, NAME_LEN, SHORT_NAME_LEN};
use portico_db::models::management::{
    CreateMainCategory, CreateStaff, CreateSubCategory, UpdateMainCategory, UpdateStaff,
    UpdateSubCategory,
};
use portico_db::repositories::{MainCategoryRepo, StaffRepo, SubCategoryRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{remove_blob, remove_blobs, replace_blob, PendingBlobs, UploadForm};

const IMAGE_FIELD: &str = "image";

/// GET /api/v1/management
///
/// Main categories, each with its sub categories and their staff.
pub async fn tree(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tree = MainCategoryRepo::tree(&state.pool).await?;
    Ok(Json(DataResponse { data: tree }))
}

// ---------------------------------------------------------------------------
// Main categories
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/management/main-categories
pub async fn create_main(
    State(state): State<AppState>,
    Json(input): Json<CreateMainCategory>,
) -> AppResult<impl IntoResponse> {
    require_text("name", &input.name, SHORT_NAME_LEN)?;
    let category = MainCategoryRepo::create(&state.pool, input.name.trim()).await?;
    tracing::info!(main_category_id = category.id, "Main category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/admin/management/main-categories/{id}
pub async fn update_main(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMainCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_text("name", name, SHORT_NAME_LEN)?;
    }
    let category = MainCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MainCategory",
            id,
        }))?;
    tracing::info!(main_category_id = id, "Main category updated");
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/admin/management/main-categories/{id}
///
/// Cascades through sub categories to staff; staff images are removed.
pub async fn delete_main(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let images = MainCategoryRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MainCategory",
            id,
        }))?;
    remove_blobs(state.storage.as_ref(), &images).await;
    tracing::info!(main_category_id = id, staff_images = images.len(), "Main category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Sub categories
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/management/sub-categories
pub async fn create_sub(
    State(state): State<AppState>,
    Json(input): Json<CreateSubCategory>,
) -> AppResult<impl IntoResponse> {
    require_text("name", &input.name, SHORT_NAME_LEN)?;
    let category = SubCategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(
        sub_category_id = category.id,
        main_category_id = category.main_category_id,
        "Sub category created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/admin/management/sub-categories/{id}
pub async fn update_sub(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_text("name", name, SHORT_NAME_LEN)?;
    }
    let category = SubCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubCategory",
            id,
        }))?;
    tracing::info!(sub_category_id = id, "Sub category updated");
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/admin/management/sub-categories/{id}
pub async fn delete_sub(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let images = SubCategoryRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubCategory",
            id,
        }))?;
    remove_blobs(state.storage.as_ref(), &images).await;
    tracing::info!(sub_category_id = id, staff_images = images.len(), "Sub category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

fn validate_staff_text(
    grade: Option<&str>,
    region: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(grade) = grade {
        limit_text("grade", grade, SHORT_NAME_LEN)?;
    }
    if let Some(region) = region {
        limit_text("region", region, SHORT_NAME_LEN)?;
    }
    Ok(())
}

/// GET /api/v1/staff/{id}
pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let staff = StaffRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Staff", id }))?;
    Ok(Json(DataResponse { data: staff }))
}

/// POST /api/v1/admin/staff (multipart: `payload`, optional `image`)
pub async fn create_staff(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: CreateStaff = form.payload()?;
    require_text("name", &input.name, NAME_LEN)?;
    require_email("email", &input.email)?;
    validate_staff_text(input.grade.as_deref(), input.region.as_deref())?;

    let mut blobs = PendingBlobs::new(&state);
    let image = blobs
        .store_optional_image(UploadDestination::StaffImage, form.take_file(IMAGE_FIELD))
        .await?;

    let staff = blobs
        .settle(StaffRepo::create(&state.pool, &input, image.as_deref()).await)
        .await?;
    tracing::info!(staff_id = staff.id, sub_category_id = staff.sub_category_id, "Staff created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: staff })))
}

/// PUT /api/v1/admin/staff/{id} (multipart: optional `payload`, optional `image`)
pub async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: UpdateStaff = form.payload_or_default()?;
    if let Some(name) = &input.name {
        require_text("name", name, NAME_LEN)?;
    }
    if let Some(email) = &input.email {
        require_email("email", email)?;
    }
    validate_staff_text(input.grade.as_deref(), input.region.as_deref())?;

    let existing = StaffRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Staff", id }))?;

    let mut blobs = PendingBlobs::new(&state);
    let image = blobs
        .store_optional_image(UploadDestination::StaffImage, form.take_file(IMAGE_FIELD))
        .await?;

    let staff = blobs
        .settle_optional(StaffRepo::update(&state.pool, id, &input, image.as_deref()).await)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Staff", id }))?;

    replace_blob(
        state.storage.as_ref(),
        existing.image.as_deref(),
        staff.image.as_deref(),
    )
    .await;
    tracing::info!(staff_id = id, "Staff updated");

    Ok(Json(DataResponse { data: staff }))
}

/// DELETE /api/v1/admin/staff/{id}
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let staff = StaffRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Staff", id }))?;
    if let Some(image) = &staff.image {
        remove_blob(state.storage.as_ref(), image).await;
    }
    tracing::info!(staff_id = id, "Staff deleted");
    Ok(StatusCode::NO_CONTENT)
}
