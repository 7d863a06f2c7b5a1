//! News categories, articles and article images.

use portico_core::publishing::{PublishState, SeoFields};
use portico_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A row from the `news_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsCategory {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateNewsCategory {
    pub name: String,
    /// Derived from `name` if `None`.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNewsCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

/// A row from the `news_articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsArticle {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub category_id: Option<DbId>,
    pub author: String,
    pub featured_image: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub publish_date: Timestamp,
    pub is_featured: bool,
    pub views_count: i64,
    pub meta_title: String,
    pub meta_description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NewsArticle {
    pub fn publish_state(&self) -> PublishState {
        PublishState {
            is_published: self.is_published,
            publish_date: self.publish_date,
            is_featured: self.is_featured,
        }
    }
}

/// DTO for creating an article. Articles start as drafts unless
/// `is_published` is set.
#[derive(Debug, Deserialize)]
pub struct CreateNewsArticle {
    pub title: String,
    /// Derived from `title` if `None`.
    pub slug: Option<String>,
    pub category_id: Option<DbId>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
    /// Defaults to now.
    pub publish_date: Option<Timestamp>,
    pub is_featured: Option<bool>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

impl CreateNewsArticle {
    /// SEO fields after backfilling blanks from the title and excerpt.
    pub fn seo(&self) -> SeoFields {
        let mut seo = SeoFields::new(
            self.meta_title.clone().unwrap_or_default(),
            self.meta_description.clone().unwrap_or_default(),
        );
        seo.backfill(&self.title, self.excerpt.as_deref().unwrap_or_default());
        seo
    }
}

/// DTO for updating an article. There is no slug field: slugs never change
/// after creation.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNewsArticle {
    pub title: Option<String>,
    pub category_id: Option<DbId>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
    pub publish_date: Option<Timestamp>,
    pub is_featured: Option<bool>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

impl UpdateNewsArticle {
    /// SEO fields for the merged record: patch values over `existing`, then
    /// blanks backfilled from the merged title and excerpt.
    pub fn seo(&self, existing: &NewsArticle) -> SeoFields {
        let mut seo = SeoFields::new(
            self.meta_title
                .clone()
                .unwrap_or_else(|| existing.meta_title.clone()),
            self.meta_description
                .clone()
                .unwrap_or_else(|| existing.meta_description.clone()),
        );
        let title = self.title.as_deref().unwrap_or(&existing.title);
        let excerpt = self.excerpt.as_deref().unwrap_or(&existing.excerpt);
        seo.backfill(title, excerpt);
        seo
    }
}

/// Body of `POST /admin/news/articles/bulk-publish`.
#[derive(Debug, Deserialize)]
pub struct BulkPublish {
    pub ids: Vec<DbId>,
    pub is_published: bool,
}

/// Public listing filters.
#[derive(Debug, Default, Clone)]
pub struct ArticleFilter {
    pub category_slug: Option<String>,
    pub featured_only: bool,
}

/// An article with its category and gallery, as shown on the detail page.
#[derive(Debug, Serialize)]
pub struct NewsArticleDetail {
    #[serde(flatten)]
    pub article: NewsArticle,
    pub category: Option<NewsCategory>,
    pub images: Vec<NewsImage>,
}

// ---------------------------------------------------------------------------
// Article images
// ---------------------------------------------------------------------------

/// A row from the `news_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsImage {
    pub id: DbId,
    pub article_id: DbId,
    pub image: String,
    pub caption: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateNewsImage {
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNewsImage {
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article() -> NewsArticle {
        NewsArticle {
            id: 1,
            title: "Old title".into(),
            slug: "old-title".into(),
            category_id: None,
            author: String::new(),
            featured_image: None,
            excerpt: "Old excerpt".into(),
            content: String::new(),
            tags: Vec::new(),
            is_published: false,
            publish_date: Utc::now(),
            is_featured: false,
            views_count: 0,
            meta_title: "Custom".into(),
            meta_description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_seo_backfills_blank_fields() {
        let input = CreateNewsArticle {
            title: "Annual Report 2024".into(),
            slug: None,
            category_id: None,
            author: None,
            excerpt: Some("Highlights of the year.".into()),
            content: None,
            tags: None,
            is_published: None,
            publish_date: None,
            is_featured: None,
            meta_title: Some("Custom".into()),
            meta_description: None,
        };
        let seo = input.seo();
        assert_eq!(seo.meta_title, "Custom");
        assert_eq!(seo.meta_description, "Highlights of the year.");
    }

    #[test]
    fn update_seo_merges_with_existing_row() {
        let patch = UpdateNewsArticle {
            excerpt: Some("New excerpt".into()),
            ..Default::default()
        };
        let seo = patch.seo(&article());
        assert_eq!(seo.meta_title, "Custom");
        assert_eq!(seo.meta_description, "New excerpt");
    }

    #[test]
    fn update_seo_clearing_title_refills_from_title() {
        let patch = UpdateNewsArticle {
            meta_title: Some(String::new()),
            title: Some("New title".into()),
            ..Default::default()
        };
        let seo = patch.seo(&article());
        assert_eq!(seo.meta_title, "New title");
    }
}
