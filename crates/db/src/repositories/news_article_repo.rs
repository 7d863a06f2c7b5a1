//! Repository for the `news_articles` table.
//!
//! Public reads only ever see *live* articles (`is_published` and
//! `publish_date <= now`). `now` is a parameter rather than `NOW()` so the
//! visibility boundary is controlled by the caller.

use portico_core::publishing::{BulkPublishAction, SeoFields};
use portico_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::news::{ArticleFilter, CreateNewsArticle, NewsArticle, UpdateNewsArticle};

const COLUMNS: &str = "id, title, slug, category_id, author, featured_image, excerpt, content, \
    tags, is_published, publish_date, is_featured, views_count, meta_title, meta_description, \
    created_at, updated_at";

/// Provides CRUD, publishing and view accounting for news articles.
pub struct NewsArticleRepo;

impl NewsArticleRepo {
    /// Insert an article. `slug` and `seo` are resolved by the caller; the
    /// publish date defaults to the insert time.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNewsArticle,
        slug: &str,
        seo: &SeoFields,
        featured_image: Option<&str>,
    ) -> Result<NewsArticle, sqlx::Error> {
        let query = format!(
            "INSERT INTO news_articles
                (title, slug, category_id, author, featured_image, excerpt, content, tags,
                 is_published, publish_date, is_featured, meta_title, meta_description)
             VALUES ($1, $2, $3, COALESCE($4, ''), $5, COALESCE($6, ''), COALESCE($7, ''),
                     COALESCE($8, '{{}}'), COALESCE($9, FALSE), COALESCE($10, NOW()),
                     COALESCE($11, FALSE), $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(input.category_id)
            .bind(&input.author)
            .bind(featured_image)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.tags)
            .bind(input.is_published)
            .bind(input.publish_date)
            .bind(input.is_featured)
            .bind(&seo.meta_title)
            .bind(&seo.meta_description)
            .fetch_one(pool)
            .await
    }

    /// Find any article by ID, drafts included.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NewsArticle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news_articles WHERE id = $1");
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live article by slug without counting a view.
    pub async fn find_live_by_slug(
        pool: &PgPool,
        slug: &str,
        now: Timestamp,
    ) -> Result<Option<NewsArticle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news_articles
             WHERE slug = $1 AND is_published AND publish_date <= $2"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(slug)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Count one view of a live article and return it with the new count.
    ///
    /// The increment happens in place (`views_count = views_count + 1`), so
    /// concurrent readers never lose a view. Returns `None` for unknown
    /// slugs and for drafts or scheduled articles, which are not counted.
    pub async fn record_view(
        pool: &PgPool,
        slug: &str,
        now: Timestamp,
    ) -> Result<Option<NewsArticle>, sqlx::Error> {
        let query = format!(
            "UPDATE news_articles SET views_count = views_count + 1
             WHERE slug = $1 AND is_published AND publish_date <= $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(slug)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Live articles, newest `publish_date` first.
    pub async fn list_live(
        pool: &PgPool,
        now: Timestamp,
        filter: &ArticleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NewsArticle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news_articles
             WHERE is_published AND publish_date <= $1
               AND ($2::TEXT IS NULL
                    OR category_id = (SELECT id FROM news_categories WHERE slug = $2))
               AND (NOT $3 OR is_featured)
             ORDER BY publish_date DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(now)
            .bind(filter.category_slug.as_deref())
            .bind(filter.featured_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every article regardless of state, most recently edited first.
    pub async fn list_all(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NewsArticle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news_articles
             ORDER BY updated_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a patch. The slug is never part of an update. `seo` holds the
    /// merged, backfilled meta fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNewsArticle,
        seo: &SeoFields,
        featured_image: Option<&str>,
    ) -> Result<Option<NewsArticle>, sqlx::Error> {
        let query = format!(
            "UPDATE news_articles SET
                title = COALESCE($2, title),
                category_id = COALESCE($3, category_id),
                author = COALESCE($4, author),
                featured_image = COALESCE($5, featured_image),
                excerpt = COALESCE($6, excerpt),
                content = COALESCE($7, content),
                tags = COALESCE($8, tags),
                is_published = COALESCE($9, is_published),
                publish_date = COALESCE($10, publish_date),
                is_featured = COALESCE($11, is_featured),
                meta_title = $12,
                meta_description = $13
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.category_id)
            .bind(&input.author)
            .bind(featured_image)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.tags)
            .bind(input.is_published)
            .bind(input.publish_date)
            .bind(input.is_featured)
            .bind(&seo.meta_title)
            .bind(&seo.meta_description)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_published` for every listed article. `publish_date` is left
    /// alone. Returns the number of rows changed.
    pub async fn bulk_set_published(
        pool: &PgPool,
        ids: &[DbId],
        action: BulkPublishAction,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE news_articles SET is_published = $2
             WHERE id = ANY($1) AND is_published IS DISTINCT FROM $2",
        )
        .bind(ids)
        .bind(action.is_published())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete an article and its images. Returns the deleted row and the
    /// cascaded image paths, collected in the same transaction.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<(NewsArticle, Vec<String>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let images: Vec<(String,)> =
            sqlx::query_as("SELECT image FROM news_images WHERE article_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let query = format!("DELETE FROM news_articles WHERE id = $1 RETURNING {COLUMNS}");
        let deleted = sqlx::query_as::<_, NewsArticle>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted.map(|a| (a, images.into_iter().map(|(path,)| path).collect())))
    }
}
