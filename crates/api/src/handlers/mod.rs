//! Request handlers.
//!
//! Each submodule provides the async handler functions for one area of the
//! site. Handlers validate input with `portico_core::validation`, delegate to
//! the repositories in `portico_db`, run uploads through
//! [`crate::uploads`] and map errors via [`AppError`](crate::error::AppError).

pub mod branch;
pub mod gallery;
pub mod management;
pub mod news;
pub mod people;
pub mod project;
pub mod publication;
