//! Route definitions for projects and their children.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Public routes mounted at the API root.
///
/// ```text
/// GET    /projects                          -> list (?category=<slug>)
/// GET    /projects/{id}                     -> get_detail
/// GET    /project-categories                -> list_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(project::list))
        .route("/projects/{id}", get(project::get_detail))
        .route("/project-categories", get(project::list_categories))
}

/// Admin routes mounted at `/admin`.
///
/// ```text
/// POST   /projects                          -> create (multipart)
/// PUT    /projects/{id}                     -> update (multipart)
/// DELETE /projects/{id}                     -> delete
///
/// POST   /projects/{id}/awards      -> create_award
/// PUT    /awards/{id}                       -> update_award
/// DELETE /awards/{id}                       -> delete_award
///
/// GET    /projects/{id}/images      -> list_images
/// POST   /projects/{id}/images      -> create_image (multipart)
/// PUT    /project-images/{id}               -> update_image (multipart)
/// DELETE /project-images/{id}               -> delete_image
///
/// POST   /projects/{id}/contractors -> create_contractor
/// PUT    /contractors/{id}                  -> update_contractor
/// DELETE /contractors/{id}                  -> delete_contractor
///
/// GET    /contractor-roles                  -> list_roles
/// POST   /contractor-roles                  -> create_role
/// PUT    /contractor-roles/{id}             -> update_role
/// DELETE /contractor-roles/{id}             -> delete_role
///
/// GET    /project-leaders                   -> list_leaders (?search=<text>)
/// POST   /project-leaders                   -> create_leader
/// PUT    /project-leaders/{id}              -> update_leader
/// DELETE /project-leaders/{id}              -> delete_leader
///
/// GET    /project-team-members              -> list_team_members (?search=<text>)
/// POST   /project-team-members              -> create_team_member
/// PUT    /project-team-members/{id}         -> update_team_member
/// DELETE /project-team-members/{id}         -> delete_team_member
///
/// POST   /project-categories                -> create_category
/// PUT    /project-categories/{id}           -> update_category
/// DELETE /project-categories/{id}           -> delete_category
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/projects", post(project::create))
        .route("/projects/{id}", put(project::update).delete(project::delete))
        .route("/projects/{id}/awards", post(project::create_award))
        .route(
            "/awards/{id}",
            put(project::update_award).delete(project::delete_award),
        )
        .route(
            "/projects/{id}/images",
            get(project::list_images).post(project::create_image),
        )
        .route(
            "/project-images/{id}",
            put(project::update_image).delete(project::delete_image),
        )
        .route(
            "/projects/{id}/contractors",
            post(project::create_contractor),
        )
        .route(
            "/contractors/{id}",
            put(project::update_contractor).delete(project::delete_contractor),
        )
        .route(
            "/contractor-roles",
            get(project::list_roles).post(project::create_role),
        )
        .route(
            "/contractor-roles/{id}",
            put(project::update_role).delete(project::delete_role),
        )
        .route(
            "/project-leaders",
            get(project::list_leaders).post(project::create_leader),
        )
        .route(
            "/project-leaders/{id}",
            put(project::update_leader).delete(project::delete_leader),
        )
        .route(
            "/project-team-members",
            get(project::list_team_members).post(project::create_team_member),
        )
        .route(
            "/project-team-members/{id}",
            put(project::update_team_member).delete(project::delete_team_member),
        )
        .route("/project-categories", post(project::create_category))
        .route(
            "/project-categories/{id}",
            put(project::update_category).delete(project::delete_category),
        )
}
