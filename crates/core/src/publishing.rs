//! Draft / publish / feature lifecycle for news articles.
//!
//! An article carries three independent axes: `is_published`,
//! `publish_date` (may be in the future) and `is_featured`. It is *live*
//! once it is published and its publish date has passed; nothing flips the
//! flag automatically, time advancing is enough to make a scheduled article
//! appear.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Number of excerpt characters copied into an empty `meta_description`.
pub const META_DESCRIPTION_LEN: usize = 320;

/// Maximum article title length.
pub const MAX_TITLE_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// The publishing axes of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishState {
    pub is_published: bool,
    pub publish_date: Timestamp,
    pub is_featured: bool,
}

impl PublishState {
    /// Visible to public listings: published and not scheduled for later.
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.is_published && self.publish_date <= now
    }

    /// Visible in featured listings.
    pub fn is_featured_live(&self, now: Timestamp) -> bool {
        self.is_featured && self.is_live(now)
    }
}

// ---------------------------------------------------------------------------
// Bulk transitions
// ---------------------------------------------------------------------------

/// Admin bulk action over a selection of articles. Only the publish flag
/// changes; `publish_date` is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkPublishAction {
    Publish,
    Unpublish,
}

impl BulkPublishAction {
    pub fn from_flag(is_published: bool) -> Self {
        if is_published {
            Self::Publish
        } else {
            Self::Unpublish
        }
    }

    /// Value written to `is_published`.
    pub fn is_published(self) -> bool {
        matches!(self, Self::Publish)
    }
}

// ---------------------------------------------------------------------------
// SEO backfill
// ---------------------------------------------------------------------------

/// SEO metadata stored alongside an article. Empty string means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoFields {
    pub meta_title: String,
    pub meta_description: String,
}

impl SeoFields {
    pub fn new(meta_title: impl Into<String>, meta_description: impl Into<String>) -> Self {
        Self {
            meta_title: meta_title.into(),
            meta_description: meta_description.into(),
        }
    }

    /// Fill blank fields from the title and excerpt. Never overwrites a
    /// value that is already set.
    pub fn backfill(&mut self, title: &str, excerpt: &str) {
        if self.meta_title.trim().is_empty() {
            self.meta_title = title.to_string();
        }
        if self.meta_description.trim().is_empty() {
            self.meta_description = truncate_chars(excerpt, META_DESCRIPTION_LEN);
        }
    }
}

/// First `max` characters of `s` (by `char`, never splitting a code point).
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an article title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
