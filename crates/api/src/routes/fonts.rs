//! Route definitions for the `/fonts` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::fonts;
use crate::state::AppState;

/// Routes mounted at `/fonts`.
///
/// ```text
/// POST   /upload  -> upload_font (multipart)
/// GET    /        -> list_fonts
/// DELETE /{id}    -> delete_font
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(fonts::upload_font))
        .route("/", get(fonts::list_fonts))
        .route("/{id}", delete(fonts::delete_font))
}
