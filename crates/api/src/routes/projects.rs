//! Route definitions for the `/projects` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                      -> list_projects
/// POST   /                      -> create_project
/// GET    /{id}                  -> get_project
/// PUT    /{id}                  -> update_project
/// DELETE /{id}                  -> delete_project
///
/// POST   /{id}/fonts            -> add_font_to_project
/// DELETE /{id}/fonts/{font_id}  -> remove_font_from_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/{id}/fonts", post(projects::add_font_to_project))
        .route(
            "/{id}/fonts/{font_id}",
            delete(projects::remove_font_from_project),
        )
}
