//! Route definitions for publications and the image gallery.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{gallery, publication};
use crate::state::AppState;

/// Public routes mounted at the API root.
///
/// ```text
/// GET    /publications                      -> publication::list (?type=<prefix>)
/// GET    /publications/{id}                 -> publication::get_by_id
/// GET    /publications/{id}/download        -> publication::download
/// GET    /gallery                           -> gallery::list (?category=<name>)
/// GET    /gallery/partitioned               -> gallery::partitioned
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/publications", get(publication::list))
        .route("/publications/{id}", get(publication::get_by_id))
        .route("/publications/{id}/download", get(publication::download))
        .route("/gallery", get(gallery::list))
        .route("/gallery/partitioned", get(gallery::partitioned))
}

/// Admin routes mounted at `/admin`.
///
/// ```text
/// POST   /publications                      -> publication::create (multipart)
/// PUT    /publications/{id}                 -> publication::update (multipart)
/// DELETE /publications/{id}                 -> publication::delete
/// POST   /gallery                           -> gallery::create (multipart)
/// PUT    /gallery/{id}                      -> gallery::update (multipart)
/// DELETE /gallery/{id}                      -> gallery::delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/publications", post(publication::create))
        .route(
            "/publications/{id}",
            put(publication::update).delete(publication::delete),
        )
        .route("/gallery", post(gallery::create))
        .route("/gallery/{id}", put(gallery::update).delete(gallery::delete))
}
