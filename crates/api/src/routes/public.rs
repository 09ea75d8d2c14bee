//! Unauthenticated routes, mounted at the root (not under `/api/v1`).

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at the root.
///
/// ```text
/// GET /projects/{slug}/css    -> project_css (text/css manifest)
/// GET /projects/{slug}/embed  -> project_embed (JSON manifest)
/// GET /assets/{*key}          -> serve_asset (HMAC-verified blob)
/// ```
///
/// Storage keys contain a `/` (the `fonts/` prefix), so the asset route
/// uses a wildcard segment.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/{slug}/css", get(public::project_css))
        .route("/projects/{slug}/embed", get(public::project_embed))
        .route("/assets/{*key}", get(public::serve_asset))
}
