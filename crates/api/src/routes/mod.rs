pub mod fonts;
pub mod health;
pub mod projects;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree (everything here requires auth).
///
/// ```text
/// /fonts/upload                 upload (multipart)
/// /fonts                        list
/// /fonts/{id}                   delete
///
/// /projects                     list, create
/// /projects/{id}                get, update, delete
/// /projects/{id}/fonts          associate font (POST)
/// /projects/{id}/fonts/{font_id} dissociate font (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/fonts", fonts::router())
        .nest("/projects", projects::router())
}
