//! Handlers for news: categories, articles and article images.
//!
//! Public reads only ever see live articles (published, publish date
//! reached). Reading an article's detail page counts one view.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use portico_core::error::CoreError;
use portico_core::publishing::{validate_title, BulkPublishAction};
use portico_core::search::page;
use portico_core::slug::resolve_new_slug;
use portico_core::storage::UploadDestination;
use portico_core::types::DbId;
use portico_core::validation::{limit_text, require_text, NAME_LEN, SHORT_NAME_LEN};
use portico_db::models::news::{
    ArticleFilter, BulkPublish, CreateNewsArticle, CreateNewsCategory, CreateNewsImage,
    NewsArticleDetail, UpdateNewsArticle, UpdateNewsCategory, UpdateNewsImage,
};
use portico_db::repositories::{NewsArticleRepo, NewsCategoryRepo, NewsImageRepo};

use crate::error::{AppError, AppResult};
use crate::query::{NewsListParams, PaginationParams};
use crate::response::{BulkResult, DataResponse};
use crate::state::AppState;
use crate::uploads::{remove_blob, remove_blobs, replace_blob, PendingBlobs, UploadForm};

const FEATURED_IMAGE_FIELD: &str = "featured_image";
const IMAGE_FIELD: &str = "image";

/// Longest single tag.
const TAG_LEN: usize = 50;

fn validate_article_fields(
    author: Option<&str>,
    tags: Option<&[String]>,
    meta_title: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(author) = author {
        limit_text("author", author, NAME_LEN)?;
    }
    for tag in tags.unwrap_or_default() {
        require_text("tag", tag, TAG_LEN)?;
    }
    if let Some(meta_title) = meta_title {
        limit_text("meta_title", meta_title, NAME_LEN)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/news/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = NewsCategoryRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/admin/news/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateNewsCategory>,
) -> AppResult<impl IntoResponse> {
    require_text("name", &input.name, SHORT_NAME_LEN)?;
    let slug = resolve_new_slug(input.slug.as_deref(), &input.name)?;

    let category = NewsCategoryRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(category_id = category.id, slug = %category.slug, "News category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/admin/news/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNewsCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_text("name", name, SHORT_NAME_LEN)?;
    }
    let category = NewsCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NewsCategory",
            id,
        }))?;
    tracing::info!(category_id = id, "News category updated");
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/admin/news/categories/{id}
///
/// Articles in the category stay, uncategorized.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NewsCategoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "NewsCategory",
            id,
        }));
    }
    tracing::info!(category_id = id, "News category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Public article reads
// ---------------------------------------------------------------------------

/// GET /api/v1/news?category=<slug>&featured=true&limit=&offset=
///
/// Live articles, newest publish date first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = page(params.limit, params.offset);
    let filter = ArticleFilter {
        category_slug: params
            .category
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        featured_only: params.featured,
    };
    let articles = NewsArticleRepo::list_live(&state.pool, Utc::now(), &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /api/v1/news/{slug}
///
/// Counts one view and returns the article with the new count, its
/// category and its images. Drafts and scheduled articles are 404.
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let article = NewsArticleRepo::record_view(&state.pool, &slug, Utc::now())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "NewsArticle",
                key: slug.clone(),
            })
        })?;

    let category = match article.category_id {
        Some(category_id) => NewsCategoryRepo::find_by_id(&state.pool, category_id).await?,
        None => None,
    };
    let images = NewsImageRepo::list_for_article(&state.pool, article.id).await?;
    tracing::debug!(article_id = article.id, views = article.views_count, "Article viewed");

    Ok(Json(DataResponse {
        data: NewsArticleDetail {
            article,
            category,
            images,
        },
    }))
}

// ---------------------------------------------------------------------------
// Admin article management
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/news/articles?limit=&offset=
///
/// Every article, drafts and scheduled ones included.
pub async fn list_all(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = page(params.limit, params.offset);
    let articles = NewsArticleRepo::list_all(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /api/v1/admin/news/articles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = NewsArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NewsArticle",
            id,
        }))?;
    Ok(Json(DataResponse { data: article }))
}

/// POST /api/v1/admin/news/articles (multipart: `payload`, optional
/// `featured_image`)
///
/// The slug is taken from the payload or derived from the title and never
/// changes afterwards. Blank SEO fields are filled from title and excerpt.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: CreateNewsArticle = form.payload()?;
    validate_title(&input.title)?;
    validate_article_fields(
        input.author.as_deref(),
        input.tags.as_deref(),
        input.meta_title.as_deref(),
    )?;
    let slug = resolve_new_slug(input.slug.as_deref(), &input.title)?;
    let seo = input.seo();

    let mut blobs = PendingBlobs::new(&state);
    let featured = blobs
        .store_optional_image(UploadDestination::NewsFeatured, form.take_file(FEATURED_IMAGE_FIELD))
        .await?;

    let article = blobs
        .settle(NewsArticleRepo::create(&state.pool, &input, &slug, &seo, featured.as_deref()).await)
        .await?;
    tracing::info!(
        article_id = article.id,
        slug = %article.slug,
        is_published = article.is_published,
        "News article created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: article })))
}

/// PUT /api/v1/admin/news/articles/{id} (multipart: optional `payload`,
/// optional `featured_image`)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: UpdateNewsArticle = form.payload_or_default()?;
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    validate_article_fields(
        input.author.as_deref(),
        input.tags.as_deref(),
        input.meta_title.as_deref(),
    )?;

    let existing = NewsArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NewsArticle",
            id,
        }))?;
    let seo = input.seo(&existing);

    let mut blobs = PendingBlobs::new(&state);
    let featured = blobs
        .store_optional_image(UploadDestination::NewsFeatured, form.take_file(FEATURED_IMAGE_FIELD))
        .await?;

    let article = blobs
        .settle_optional(
            NewsArticleRepo::update(&state.pool, id, &input, &seo, featured.as_deref()).await,
        )
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NewsArticle",
            id,
        }))?;

    replace_blob(
        state.storage.as_ref(),
        existing.featured_image.as_deref(),
        article.featured_image.as_deref(),
    )
    .await;
    tracing::info!(article_id = id, slug = %article.slug, "News article updated");

    Ok(Json(DataResponse { data: article }))
}

/// POST /api/v1/admin/news/articles/bulk-publish
///
/// Sets `is_published` on every listed article. Publish dates are left
/// alone, so a scheduled article stays scheduled.
pub async fn bulk_publish(
    State(state): State<AppState>,
    Json(input): Json<BulkPublish>,
) -> AppResult<impl IntoResponse> {
    if input.ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".into()));
    }
    let action = BulkPublishAction::from_flag(input.is_published);
    let updated = NewsArticleRepo::bulk_set_published(&state.pool, &input.ids, action).await?;
    tracing::info!(
        requested = input.ids.len(),
        updated,
        action = ?action,
        "Bulk publish applied"
    );
    Ok(Json(DataResponse {
        data: BulkResult { updated },
    }))
}

/// DELETE /api/v1/admin/news/articles/{id}
///
/// The article's images go with it; featured and gallery files are removed
/// after the rows.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (article, images) = NewsArticleRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NewsArticle",
            id,
        }))?;

    let storage = state.storage.as_ref();
    if let Some(featured) = &article.featured_image {
        remove_blob(storage, featured).await;
    }
    remove_blobs(storage, &images).await;
    tracing::info!(article_id = id, slug = %article.slug, images = images.len(), "News article deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Article images
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/news/articles/{id}/images
pub async fn list_images(
    State(state): State<AppState>,
    Path(article_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let images = NewsImageRepo::list_for_article(&state.pool, article_id).await?;
    Ok(Json(DataResponse { data: images }))
}

/// POST /api/v1/admin/news/articles/{id}/images (multipart:
/// optional `payload`, required `image`)
pub async fn create_image(
    State(state): State<AppState>,
    Path(article_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: CreateNewsImage = form.payload_or_default()?;
    if let Some(caption) = &input.caption {
        limit_text("caption", caption, NAME_LEN)?;
    }
    let file = form.require_file(IMAGE_FIELD)?;

    NewsArticleRepo::find_by_id(&state.pool, article_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NewsArticle",
            id: article_id,
        }))?;

    let mut blobs = PendingBlobs::new(&state);
    let path = blobs.store_image(UploadDestination::NewsGallery, file).await?;

    let image = blobs
        .settle(NewsImageRepo::create(&state.pool, article_id, &input, &path).await)
        .await?;
    tracing::info!(article_id, news_image_id = image.id, "News image created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: image })))
}

/// PUT /api/v1/admin/news/images/{id}
pub async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let input: UpdateNewsImage = form.payload_or_default()?;
    if let Some(caption) = &input.caption {
        limit_text("caption", caption, NAME_LEN)?;
    }

    let existing = NewsImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NewsImage",
            id,
        }))?;

    let mut blobs = PendingBlobs::new(&state);
    let path = blobs
        .store_optional_image(UploadDestination::NewsGallery, form.take_file(IMAGE_FIELD))
        .await?;

    let image = blobs
        .settle_optional(NewsImageRepo::update(&state.pool, id, &input, path.as_deref()).await)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NewsImage",
            id,
        }))?;

    replace_blob(state.storage.as_ref(), Some(&existing.image), Some(&image.image)).await;
    tracing::info!(news_image_id = id, "News image updated");

    Ok(Json(DataResponse { data: image }))
}

/// DELETE /api/v1/admin/news/images/{id}
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let image = NewsImageRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NewsImage",
            id,
        }))?;
    remove_blob(state.storage.as_ref(), &image.image).await;
    tracing::info!(news_image_id = id, article_id = image.article_id, "News image deleted");
    Ok(StatusCode::NO_CONTENT)
}
