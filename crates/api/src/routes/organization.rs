//! Route definitions for the organization pages: management tree, staff,
//! people, board members and branches.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{branch, management, people};
use crate::state::AppState;

/// Public routes mounted at the API root.
///
/// ```text
/// GET    /management                        -> management::tree
/// GET    /staff/{id}                        -> management::get_staff
/// GET    /people                            -> people::list_people
/// GET    /board-members                     -> people::list_board
/// GET    /board-members/{id}                -> people::get_board_member
/// GET    /branches                          -> branch::list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/management", get(management::tree))
        .route("/staff/{id}", get(management::get_staff))
        .route("/people", get(people::list_people))
        .route("/board-members", get(people::list_board))
        .route("/board-members/{id}", get(people::get_board_member))
        .route("/branches", get(branch::list))
}

/// Admin routes mounted at `/admin`.
///
/// ```text
/// POST   /management/main-categories        -> create_main
/// PUT    /management/main-categories/{id}   -> update_main
/// DELETE /management/main-categories/{id}   -> delete_main
/// POST   /management/sub-categories         -> create_sub
/// PUT    /management/sub-categories/{id}    -> update_sub
/// DELETE /management/sub-categories/{id}    -> delete_sub
/// POST   /staff                             -> create_staff (multipart)
/// PUT    /staff/{id}                        -> update_staff (multipart)
/// DELETE /staff/{id}                        -> delete_staff
///
/// POST   /people                            -> create_person (multipart)
/// PUT    /people/{id}                       -> update_person (multipart)
/// DELETE /people/{id}                       -> delete_person
///
/// POST   /board-members                     -> create_board_member (multipart)
/// PUT    /board-members/{id}                -> update_board_member (multipart)
/// DELETE /board-members/{id}                -> delete_board_member
///
/// POST   /branches                          -> branch::create
/// PUT    /branches/{id}                     -> branch::update
/// DELETE /branches/{id}                     -> branch::delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/management/main-categories", post(management::create_main))
        .route(
            "/management/main-categories/{id}",
            put(management::update_main).delete(management::delete_main),
        )
        .route("/management/sub-categories", post(management::create_sub))
        .route(
            "/management/sub-categories/{id}",
            put(management::update_sub).delete(management::delete_sub),
        )
        .route("/staff", post(management::create_staff))
        .route(
            "/staff/{id}",
            put(management::update_staff).delete(management::delete_staff),
        )
        .route("/people", post(people::create_person))
        .route(
            "/people/{id}",
            put(people::update_person).delete(people::delete_person),
        )
        .route("/board-members", post(people::create_board_member))
        .route(
            "/board-members/{id}",
            put(people::update_board_member).delete(people::delete_board_member),
        )
        .route("/branches", post(branch::create))
        .route("/branches/{id}", put(branch::update).delete(branch::delete))
}
