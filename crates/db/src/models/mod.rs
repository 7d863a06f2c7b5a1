//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Stored file paths (images, documents) are never part of a DTO; they come
//! out of the upload pipeline and are passed to the repositories separately.

pub mod board_member;
pub mod branch;
pub mod gallery_image;
pub mod management;
pub mod news;
pub mod person;
pub mod project;
pub mod project_category;
pub mod publication;
