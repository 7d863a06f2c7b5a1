//! Route definitions for news.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::news;
use crate::state::AppState;

/// Public routes mounted at `/news`.
///
/// ```text
/// GET    /                                  -> list (?category=&featured=&limit=&offset=)
/// GET    /categories                        -> list_categories
/// GET    /{slug}                            -> get_by_slug (counts a view)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(news::list))
        .route("/categories", get(news::list_categories))
        .route("/{slug}", get(news::get_by_slug))
}

/// Admin routes mounted at `/admin/news`.
///
/// ```text
/// POST   /categories                        -> create_category
/// PUT    /categories/{id}                   -> update_category
/// DELETE /categories/{id}                   -> delete_category
///
/// GET    /articles                          -> list_all
/// POST   /articles                          -> create (multipart)
/// POST   /articles/bulk-publish             -> bulk_publish
/// GET    /articles/{id}                     -> get_by_id
/// PUT    /articles/{id}                     -> update (multipart)
/// DELETE /articles/{id}                     -> delete
///
/// GET    /articles/{id}/images      -> list_images
/// POST   /articles/{id}/images      -> create_image (multipart)
/// PUT    /images/{id}                       -> update_image (multipart)
/// DELETE /images/{id}                       -> delete_image
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(news::create_category))
        .route(
            "/categories/{id}",
            put(news::update_category).delete(news::delete_category),
        )
        .route("/articles", get(news::list_all).post(news::create))
        .route("/articles/bulk-publish", post(news::bulk_publish))
        .route(
            "/articles/{id}",
            get(news::get_by_id).put(news::update).delete(news::delete),
        )
        .route(
            "/articles/{id}/images",
            get(news::list_images).post(news::create_image),
        )
        .route(
            "/images/{id}",
            put(news::update_image).delete(news::delete_image),
        )
}
