//! Blob storage for uploaded images and documents.
//!
//! Provides the [`BlobStorage`] trait (store / retrieve / delete by a
//! namespaced relative path), a local-filesystem backend, the upload
//! destinations for each entity, and the naming scheme for stored files.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::slug::derive_slug;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Image every board member gets until a real one is uploaded. Shared, so it
/// is never deleted along with a record.
pub const DEFAULT_BOARD_MEMBER_IMAGE: &str = "board_members/default.jpg";

/// Number of hex characters of the content digest kept in stored names.
const CONTENT_TAG_LEN: usize = 8;

/// Number of hex characters of the per-upload random token.
const UPLOAD_TOKEN_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path '{0}'")]
    InvalidPath(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Upload destinations
// ---------------------------------------------------------------------------

/// Where each kind of upload lives inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadDestination {
    ProjectPicture,
    ProjectGallery,
    StaffImage,
    ProfilePicture,
    PublicationDocument,
    PublicationCover,
    BoardMember,
    Gallery,
    NewsFeatured,
    NewsGallery,
}

impl UploadDestination {
    /// Directory prefix inside the store.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::ProjectPicture => "projects/main_pictures",
            Self::ProjectGallery => "projects/gallery",
            Self::StaffImage => "staff_images",
            Self::ProfilePicture => "profiles",
            Self::PublicationDocument => "publications",
            Self::PublicationCover => "publications/covers",
            Self::BoardMember => "board_members",
            Self::Gallery => "gallery",
            Self::NewsFeatured => "news/featured",
            Self::NewsGallery => "news/gallery",
        }
    }
}

/// First [`CONTENT_TAG_LEN`] hex chars of the SHA-256 of `data`.
pub fn content_tag(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    let mut hex = format!("{hash:x}");
    hex.truncate(CONTENT_TAG_LEN);
    hex
}

/// Fresh random token for one upload.
pub fn upload_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(UPLOAD_TOKEN_LEN);
    token
}

/// Build the stored path for an upload: `<prefix>/<stem>-<tag>-<token>.<ext>`.
///
/// The stem is slugified so user-supplied names cannot escape the prefix.
/// `token` comes from [`upload_token`]; every upload owns its file, so two
/// records holding identical bytes never share one and deleting one record
/// cannot remove the other's file.
pub fn stored_path(
    destination: UploadDestination,
    filename: &str,
    data: &[u8],
    token: &str,
) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(derive_slug)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "upload".to_string());
    let tag = content_tag(data);

    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        Some(ext) => format!("{}/{stem}-{tag}-{token}.{ext}", destination.prefix()),
        None => format!("{}/{stem}-{tag}-{token}", destination.prefix()),
    }
}

/// `true` for paths shared between records that must survive deletes.
pub fn is_shared_default(path: &str) -> bool {
    path == DEFAULT_BOARD_MEMBER_IMAGE
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Store bytes under a namespaced path, fetch them back, delete them.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Write `data` at `path`, replacing any existing content.
    async fn put(&self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Read the content stored at `path`.
    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove `path`. Returns `false` if nothing was stored there.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// Whether something is stored at `path`.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;
}

// ---------------------------------------------------------------------------
// Local filesystem backend
// ---------------------------------------------------------------------------

/// Stores blobs as files under a root directory (`MEDIA_ROOT`).
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative storage path to a file under the root. Absolute paths
    /// and `..` components are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        if path.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStorage for LocalStorage {
    async fn put(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, data).await?;
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&full).await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn content_tag_is_short_and_stable() {
        let tag = content_tag(b"hello world");
        assert_eq!(tag.len(), CONTENT_TAG_LEN);
        assert_eq!(tag, content_tag(b"hello world"));
        assert_ne!(tag, content_tag(b"hello world!"));
        // Prefix of the well-known SHA-256 of the empty string.
        assert_eq!(content_tag(b""), "e3b0c442");
    }

    #[test]
    fn stored_path_uses_destination_prefix() {
        let path = stored_path(UploadDestination::StaffImage, "Jane Doe.JPG", b"x", "0a1b2c3d");
        assert!(path.starts_with("staff_images/jane-doe-"));
        assert!(path.ends_with(".jpg"));
    }

    #[test]
    fn stored_path_sanitizes_traversal() {
        let path = stored_path(UploadDestination::Gallery, "../../etc/passwd", b"x", "0a1b2c3d");
        assert!(path.starts_with("gallery/passwd-"));
        assert!(!path.contains(".."));
    }

    #[test]
    fn stored_path_falls_back_for_blank_stem() {
        let path = stored_path(UploadDestination::NewsFeatured, "!!!.png", b"x", "0a1b2c3d");
        assert!(path.starts_with("news/featured/upload-"));
        assert!(path.ends_with(".png"));
    }

    #[test]
    fn stored_path_without_extension() {
        let path = stored_path(UploadDestination::PublicationDocument, "report", b"x", "0a1b2c3d");
        assert_eq!(
            path,
            format!("publications/report-{}-0a1b2c3d", content_tag(b"x"))
        );
    }

    #[test]
    fn same_bytes_get_distinct_paths_per_upload() {
        let first = stored_path(UploadDestination::Gallery, "site.png", b"x", &upload_token());
        let second = stored_path(UploadDestination::Gallery, "site.png", b"x", &upload_token());
        assert_ne!(first, second);
        assert_eq!(upload_token().len(), UPLOAD_TOKEN_LEN);
    }

    #[test]
    fn shared_default_detection() {
        assert!(is_shared_default(DEFAULT_BOARD_MEMBER_IMAGE));
        assert!(!is_shared_default("board_members/jane-1234abcd.jpg"));
    }

    #[tokio::test]
    async fn local_put_get_delete() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(!storage.exists("staff_images/a.jpg").await.unwrap());
        storage.put("staff_images/a.jpg", b"bytes").await.unwrap();
        assert!(storage.exists("staff_images/a.jpg").await.unwrap());
        assert_eq!(storage.get("staff_images/a.jpg").await.unwrap(), b"bytes");
        assert!(tmp.path().join("staff_images/a.jpg").exists());

        assert!(storage.delete("staff_images/a.jpg").await.unwrap());
        assert!(!storage.delete("staff_images/a.jpg").await.unwrap());
        assert_matches!(
            storage.get("staff_images/a.jpg").await,
            Err(StorageError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn local_put_replaces_content() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.put("gallery/x.png", b"one").await.unwrap();
        storage.put("gallery/x.png", b"two").await.unwrap();
        assert_eq!(storage.get("gallery/x.png").await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn local_rejects_escaping_paths() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert_matches!(
            storage.put("../outside.txt", b"x").await,
            Err(StorageError::InvalidPath(_))
        );
        assert_matches!(
            storage.get("/etc/passwd").await,
            Err(StorageError::InvalidPath(_))
        );
        assert_matches!(storage.delete("").await, Err(StorageError::InvalidPath(_)));
    }
}
