pub mod health;
pub mod media;
pub mod news;
pub mod organization;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects, /projects/{id}                        public project pages
/// /project-categories                              category list
/// /management, /staff/{id}                         management tree
/// /people, /board-members[/{id}], /branches        organization pages
/// /publications[/{id}[/download]]                  publications
/// /gallery, /gallery/partitioned                   image gallery
/// /news, /news/categories, /news/{slug}            live news
///
/// /admin/...                                       create / update / delete
///                                                  for every entity above
/// /admin/news/...                                  news administration
/// ```
///
/// See each module's `router` / `admin_router` for the full tables.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(project::router())
        .merge(organization::router())
        .merge(media::router())
        .nest("/news", news::router())
        .nest("/admin", admin_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(project::admin_router())
        .merge(organization::admin_router())
        .merge(media::admin_router())
        .nest("/news", news::admin_router())
}
