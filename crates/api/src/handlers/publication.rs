//! Handlers for publications and their downloadable documents.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use portico_core::documents::{content_type_for, download_name, type_prefix_pattern};
use portico_core::error::CoreError;
use portico_core::storage::UploadDestination;
use portico_core::types::DbId;
use portico_core::validation::{limit_text, require_text, NAME_LEN, SHORT_NAME_LEN};
use portico_db::models::publication::{CreatePublication, UpdatePublication};
use portico_db::repositories::PublicationRepo;

use crate::error::{AppError, AppResult};
use crate::query::PublicationListParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{remove_blob, replace_blob, PendingBlobs, UploadForm};

const DOCUMENT_FIELD: &str = "document";
const COVER_FIELD: &str = "cover_image";

/// GET /api/v1/publications?type=<prefix>
///
/// `type` matches the start of `publication_type`, case-insensitively.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PublicationListParams>,
) -> AppResult<impl IntoResponse> {
    let pattern = type_prefix_pattern(params.publication_type.as_deref());
    let publications = PublicationRepo::list(&state.pool, pattern.as_deref()).await?;
    Ok(Json(DataResponse { data: publications }))
}

/// GET /api/v1/publications/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let publication = PublicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Publication",
            id,
        }))?;
    Ok(Json(DataResponse { data: publication }))
}

/// GET /api/v1/publications/{id}/download
///
/// Streams the stored document as an attachment, typed by its extension.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let publication = PublicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Publication",
            id,
        }))?;
    let path = publication
        .document
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PublicationDocument",
            id,
        }))?;

    let bytes = state.storage.get(&path).await?;
    let content_type = content_type_for(&path);
    let disposition = format!("attachment; filename=\"{}\"", download_name(&path));
    tracing::debug!(publication_id = id, path = %path, content_type = %content_type, "Serving document");

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// POST /api/v1/admin/publications (multipart: `payload`, optional
/// `document`, optional `cover_image`)
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: CreatePublication = form.payload()?;
    require_text("title", &input.title, NAME_LEN)?;
    if let Some(kind) = &input.publication_type {
        limit_text("publication_type", kind, SHORT_NAME_LEN)?;
    }

    let mut blobs = PendingBlobs::new(&state);
    let document = blobs
        .store_document(UploadDestination::PublicationDocument, form.take_file(DOCUMENT_FIELD))
        .await?;
    let cover = blobs
        .store_optional_image(UploadDestination::PublicationCover, form.take_file(COVER_FIELD))
        .await?;

    let publication = blobs
        .settle(
            PublicationRepo::create(&state.pool, &input, document.as_deref(), cover.as_deref())
                .await,
        )
        .await?;
    tracing::info!(publication_id = publication.id, title = %publication.title, "Publication created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: publication })))
}

/// PUT /api/v1/admin/publications/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: UpdatePublication = form.payload_or_default()?;
    if let Some(title) = &input.title {
        require_text("title", title, NAME_LEN)?;
    }

    let existing = PublicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Publication",
            id,
        }))?;

    let mut blobs = PendingBlobs::new(&state);
    let document = blobs
        .store_document(UploadDestination::PublicationDocument, form.take_file(DOCUMENT_FIELD))
        .await?;
    let cover = blobs
        .store_optional_image(UploadDestination::PublicationCover, form.take_file(COVER_FIELD))
        .await?;

    let publication = blobs
        .settle_optional(
            PublicationRepo::update(&state.pool, id, &input, document.as_deref(), cover.as_deref())
                .await,
        )
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Publication",
            id,
        }))?;

    let storage = state.storage.as_ref();
    replace_blob(storage, existing.document.as_deref(), publication.document.as_deref()).await;
    replace_blob(
        storage,
        existing.cover_image.as_deref(),
        publication.cover_image.as_deref(),
    )
    .await;
    tracing::info!(publication_id = id, "Publication updated");

    Ok(Json(DataResponse { data: publication }))
}

/// DELETE /api/v1/admin/publications/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let publication = PublicationRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Publication",
            id,
        }))?;

    let storage = state.storage.as_ref();
    for path in [&publication.document, &publication.cover_image]
        .into_iter()
        .flatten()
    {
        remove_blob(storage, path).await;
    }
    tracing::info!(publication_id = id, "Publication deleted");
    Ok(StatusCode::NO_CONTENT)
}
