//! Handlers for the standalone image gallery.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use portico_core::error::CoreError;
use portico_core::gallery::{partition_by_category, GalleryCategory};
use portico_core::storage::UploadDestination;
use portico_core::types::DbId;
use portico_core::validation::{limit_text, NAME_LEN};
use portico_db::models::gallery_image::{CreateGalleryImage, GalleryImage, UpdateGalleryImage};
use portico_db::repositories::GalleryImageRepo;

use crate::error::{AppError, AppResult};
use crate::query::GalleryListParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{remove_blob, replace_blob, PendingBlobs, UploadForm};

const IMAGE_FIELD: &str = "image";

/// GET /api/v1/gallery?category=<name>
///
/// Active images, newest first. The category is matched case-insensitively;
/// a name outside the vocabulary matches nothing.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<GalleryListParams>,
) -> AppResult<impl IntoResponse> {
    let requested = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let images: Vec<GalleryImage> = match requested {
        None => GalleryImageRepo::list_active(&state.pool, None).await?,
        Some(name) => match GalleryCategory::from_name(name) {
            Some(category) => GalleryImageRepo::list_active(&state.pool, Some(category)).await?,
            None => {
                tracing::warn!(category = %name, "Gallery filter names an unknown category");
                Vec::new()
            }
        },
    };
    Ok(Json(DataResponse { data: images }))
}

/// GET /api/v1/gallery/partitioned
///
/// Every category in vocabulary order with its active images, empty
/// categories included.
pub async fn partitioned(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let images = GalleryImageRepo::list_active(&state.pool, None).await?;
    let buckets = partition_by_category(images, |img| img.category());
    Ok(Json(DataResponse { data: buckets }))
}

/// POST /api/v1/admin/gallery (multipart: `payload`, required `image`)
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: CreateGalleryImage = form.payload()?;
    let category = GalleryCategory::parse(&input.category)?;
    if let Some(alt) = &input.alt_text {
        limit_text("alt_text", alt, NAME_LEN)?;
    }
    let file = form.require_file(IMAGE_FIELD)?;

    let mut blobs = PendingBlobs::new(&state);
    let path = blobs.store_image(UploadDestination::Gallery, file).await?;

    let image = blobs
        .settle(GalleryImageRepo::create(&state.pool, &input, category, &path).await)
        .await?;
    tracing::info!(gallery_image_id = image.id, category = %image.category, "Gallery image created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: image })))
}

/// PUT /api/v1/admin/gallery/{id} (multipart: optional `payload`, optional `image`)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: UpdateGalleryImage = form.payload_or_default()?;
    let category = input
        .category
        .as_deref()
        .map(GalleryCategory::parse)
        .transpose()?;
    if let Some(alt) = &input.alt_text {
        limit_text("alt_text", alt, NAME_LEN)?;
    }

    let existing = GalleryImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "GalleryImage",
            id,
        }))?;

    let mut blobs = PendingBlobs::new(&state);
    let path = blobs
        .store_optional_image(UploadDestination::Gallery, form.take_file(IMAGE_FIELD))
        .await?;

    let image = blobs
        .settle_optional(
            GalleryImageRepo::update(&state.pool, id, &input, category, path.as_deref()).await,
        )
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "GalleryImage",
            id,
        }))?;

    replace_blob(state.storage.as_ref(), Some(&existing.image), Some(&image.image)).await;
    tracing::info!(gallery_image_id = id, "Gallery image updated");

    Ok(Json(DataResponse { data: image }))
}

/// DELETE /api/v1/admin/gallery/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let image = GalleryImageRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "GalleryImage",
            id,
        }))?;
    remove_blob(state.storage.as_ref(), &image.image).await;
    tracing::info!(gallery_image_id = id, "Gallery image deleted");
    Ok(StatusCode::NO_CONTENT)
}
