//! Domain logic for the firm's public site: image normalization, blob
//! storage, slugs, news publishing rules and gallery vocabularies.
//!
//! Nothing in this crate touches the database or HTTP; `portico-db` and
//! `portico-api` build on it.

pub mod documents;
pub mod error;
pub mod gallery;
pub mod media;
pub mod publishing;
pub mod search;
pub mod slug;
pub mod storage;
pub mod types;
pub mod validation;
