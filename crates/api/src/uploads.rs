//! Multipart parsing and the save-with-image pipeline.
//!
//! Admin writes for entities that carry files arrive as `multipart/form-data`:
//! one `payload` part holding the JSON body, plus file parts named after the
//! field they fill (`image`, `picture`, `document`, `cover_image`, ...).
//!
//! Saving follows the same sequence everywhere:
//!
//! 1. [`PendingBlobs::store_image`] normalizes the upload on a blocking
//!    thread and writes it under a fresh name owned by this upload. If any
//!    store step fails, the blobs already written by the request are deleted
//!    before the error is returned.
//! 2. The handler writes the row.
//! 3. [`PendingBlobs::settle`] either keeps the new blobs or, when the row
//!    write failed, deletes the ones this request created.
//! 4. After a successful update or delete, superseded blobs are removed with
//!    [`replace_blob`] / [`remove_blob`] on a best-effort basis.

use std::collections::HashMap;

use axum::extract::Multipart;
use portico_core::media::{normalize_with_limits, MediaPayload, SourceLimits};
use portico_core::storage::{
    is_shared_default, stored_path, upload_token, BlobStorage, UploadDestination,
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Name of the multipart part that carries the JSON body.
pub const PAYLOAD_FIELD: &str = "payload";

// ---------------------------------------------------------------------------
// Multipart form
// ---------------------------------------------------------------------------

/// A parsed multipart submission.
#[derive(Debug, Default)]
pub struct UploadForm {
    payload: Option<String>,
    files: HashMap<String, MediaPayload>,
}

impl UploadForm {
    /// Drain a multipart stream. Unknown text parts are ignored; every part
    /// with a filename is kept as a file.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == PAYLOAD_FIELD {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.payload = Some(text);
                continue;
            }

            let Some(filename) = field.file_name().map(str::to_string) else {
                continue;
            };
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.files
                .insert(name, MediaPayload::new(filename, data.to_vec()));
        }

        Ok(form)
    }

    /// Deserialize the `payload` part. Required.
    pub fn payload<T: DeserializeOwned>(&self) -> AppResult<T> {
        let raw = self
            .payload
            .as_deref()
            .ok_or_else(|| AppError::BadRequest(format!("Missing required '{PAYLOAD_FIELD}' field")))?;
        parse_payload(raw)
    }

    /// Deserialize the `payload` part, or `T::default()` when the form only
    /// carries files.
    pub fn payload_or_default<T: DeserializeOwned + Default>(&self) -> AppResult<T> {
        match self.payload.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_payload(raw),
            _ => Ok(T::default()),
        }
    }

    /// Take the file submitted under `name`. An empty file part means no
    /// file was chosen and yields `None`.
    pub fn take_file(&mut self, name: &str) -> Option<MediaPayload> {
        self.files.remove(name).filter(|f| !f.is_empty())
    }

    /// Like [`take_file`](Self::take_file) but the file must be present.
    pub fn require_file(&mut self, name: &str) -> AppResult<MediaPayload> {
        self.take_file(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing required '{name}' file")))
    }
}

fn parse_payload<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::BadRequest(format!("Invalid '{PAYLOAD_FIELD}' JSON: {e}")))
}

// ---------------------------------------------------------------------------
// Pending blobs
// ---------------------------------------------------------------------------

/// Blobs written during one request, tracked until the row write settles.
pub struct PendingBlobs<'a> {
    storage: &'a dyn BlobStorage,
    limits: SourceLimits,
    created: Vec<String>,
}

impl<'a> PendingBlobs<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            storage: state.storage.as_ref(),
            limits: state.config.source_limits(),
            created: Vec::new(),
        }
    }

    /// Normalize an image and store it under `destination`. Returns the
    /// stored path.
    ///
    /// A decode failure writes nothing and deletes whatever earlier steps of
    /// this request stored.
    pub async fn store_image(
        &mut self,
        destination: UploadDestination,
        payload: MediaPayload,
    ) -> AppResult<String> {
        let result = self.normalize_and_put(destination, payload).await;
        self.rollback_on_err(result).await
    }

    /// [`store_image`](Self::store_image) for an optional upload.
    pub async fn store_optional_image(
        &mut self,
        destination: UploadDestination,
        payload: Option<MediaPayload>,
    ) -> AppResult<Option<String>> {
        match payload {
            Some(p) => self.store_image(destination, p).await.map(Some),
            None => Ok(None),
        }
    }

    /// Store a document as uploaded (no normalization).
    pub async fn store_document(
        &mut self,
        destination: UploadDestination,
        payload: Option<MediaPayload>,
    ) -> AppResult<Option<String>> {
        let Some(p) = payload else {
            return Ok(None);
        };
        let result = if p.bytes.len() > self.limits.max_bytes {
            Err(AppError::BadRequest(format!(
                "Document exceeds the {} byte limit",
                self.limits.max_bytes
            )))
        } else {
            self.put(destination, p).await
        };
        self.rollback_on_err(result).await.map(Some)
    }

    async fn normalize_and_put(
        &mut self,
        destination: UploadDestination,
        payload: MediaPayload,
    ) -> AppResult<String> {
        let limits = self.limits;
        let normalized = tokio::task::spawn_blocking(move || normalize_with_limits(payload, &limits))
            .await
            .map_err(|e| AppError::InternalError(format!("Image task failed: {e}")))??;
        self.put(destination, normalized).await
    }

    async fn put(
        &mut self,
        destination: UploadDestination,
        payload: MediaPayload,
    ) -> AppResult<String> {
        let mut path = stored_path(destination, &payload.filename, &payload.bytes, &upload_token());
        while self.storage.exists(&path).await? {
            path = stored_path(destination, &payload.filename, &payload.bytes, &upload_token());
        }
        self.storage.put(&path, &payload.bytes).await?;
        self.created.push(path.clone());
        tracing::debug!(path = %path, bytes = payload.bytes.len(), "Stored upload");
        Ok(path)
    }

    async fn rollback_on_err<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        if let Err(err) = &result {
            tracing::warn!(error = %err, count = self.created.len(), "Upload failed, discarding stored files");
            self.rollback().await;
        }
        result
    }

    /// Delete every blob this request created so far.
    async fn rollback(&mut self) {
        for path in self.created.drain(..) {
            remove_blob(self.storage, &path).await;
        }
    }

    /// Resolve the row write. On error every blob created by this request is
    /// deleted before the original error is returned.
    pub async fn settle<T>(mut self, result: Result<T, sqlx::Error>) -> AppResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                self.rollback().await;
                Err(err.into())
            }
        }
    }

    /// Like [`settle`](Self::settle) for a row write that may find no row
    /// (updates). A missing row also rolls back the new blobs.
    pub async fn settle_optional<T>(
        mut self,
        result: Result<Option<T>, sqlx::Error>,
    ) -> AppResult<Option<T>> {
        match result {
            Ok(Some(value)) => Ok(Some(value)),
            Ok(None) => {
                self.rollback().await;
                Ok(None)
            }
            Err(err) => self.settle(Err(err)).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

/// Delete a blob after its row is gone. Failures are logged, never returned.
/// The shared default board member image is never deleted.
pub async fn remove_blob(storage: &dyn BlobStorage, path: &str) {
    if path.is_empty() || is_shared_default(path) {
        return;
    }
    match storage.delete(path).await {
        Ok(true) => tracing::info!(path = %path, "Deleted stored file"),
        Ok(false) => tracing::warn!(path = %path, "Stored file already missing"),
        Err(e) => tracing::warn!(path = %path, error = %e, "Failed to delete stored file"),
    }
}

/// Remove every blob in `paths`.
pub async fn remove_blobs<I, S>(storage: &dyn BlobStorage, paths: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for path in paths {
        remove_blob(storage, path.as_ref()).await;
    }
}

/// After an update committed: delete `previous` if the row now points at a
/// different file.
pub async fn replace_blob(storage: &dyn BlobStorage, previous: Option<&str>, current: Option<&str>) {
    if let (Some(old), Some(new)) = (previous, current) {
        if old != new {
            remove_blob(storage, old).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use portico_core::storage::{LocalStorage, DEFAULT_BOARD_MEMBER_IMAGE};

    #[test]
    fn payload_or_default_accepts_missing_part() {
        #[derive(Debug, Default, serde::Deserialize, PartialEq)]
        struct Patch {
            name: Option<String>,
        }

        let form = UploadForm::default();
        assert_eq!(form.payload_or_default::<Patch>().unwrap(), Patch::default());
        assert!(form.payload::<Patch>().is_err());
    }

    #[test]
    fn empty_file_part_is_no_file() {
        let mut form = UploadForm::default();
        form.files
            .insert("image".into(), MediaPayload::new("empty.jpg", Vec::new()));
        form.files
            .insert("document".into(), MediaPayload::new("a.pdf", b"%PDF".to_vec()));

        assert!(form.take_file("image").is_none());
        assert!(form.take_file("document").is_some());
        assert!(form.require_file("document").is_err());
    }

    #[tokio::test]
    async fn remove_blob_keeps_shared_default() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage.put(DEFAULT_BOARD_MEMBER_IMAGE, b"jpg").await.unwrap();
        storage.put("board_members/jane-1a2b3c4d.jpg", b"jpg").await.unwrap();

        remove_blob(&storage, DEFAULT_BOARD_MEMBER_IMAGE).await;
        remove_blob(&storage, "board_members/jane-1a2b3c4d.jpg").await;

        assert!(storage.exists(DEFAULT_BOARD_MEMBER_IMAGE).await.unwrap());
        assert!(!storage.exists("board_members/jane-1a2b3c4d.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn replace_blob_only_deletes_superseded_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage.put("gallery/a.jpg", b"a").await.unwrap();
        storage.put("gallery/b.jpg", b"b").await.unwrap();

        replace_blob(&storage, Some("gallery/a.jpg"), Some("gallery/a.jpg")).await;
        assert!(storage.exists("gallery/a.jpg").await.unwrap());

        replace_blob(&storage, Some("gallery/a.jpg"), None).await;
        assert!(storage.exists("gallery/a.jpg").await.unwrap());

        replace_blob(&storage, Some("gallery/a.jpg"), Some("gallery/b.jpg")).await;
        assert!(!storage.exists("gallery/a.jpg").await.unwrap());
        assert!(storage.exists("gallery/b.jpg").await.unwrap());
    }
}
