//! Unauthenticated embed surface.
//!
//! Three routes, all keyed by data in the URL rather than a session:
//! the per-project CSS manifest, its JSON equivalent, and the signed
//! blob route that HMAC-issued URLs point back at. Every manifest
//! render issues fresh signed URLs, so a manifest fetched shortly
//! before its URLs expire still embeds a full validity window.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use typevault_core::css::{self, FontFaceRule};
use typevault_core::error::CoreError;
use typevault_core::format::FontFormat;
use typevault_core::types::DbId;
use typevault_db::models::font::FontWithAssets;
use typevault_db::repositories::{FontRepo, ProjectRepo};
use typevault_storage::StorageError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Concurrent presign fan-out when rendering a manifest.
const PRESIGN_FANOUT: usize = 8;

/// GET /projects/{slug}/css
///
/// Renders the project's `@font-face` stylesheet. A project with no
/// fonts yields a valid empty stylesheet.
pub async fn project_css(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let project = find_by_slug(&state, &slug).await?;
    let fonts = FontRepo::list_by_project(&state.pool, project.id).await?;

    let rules: Vec<FontFaceRule> = presign_members(&state, fonts)
        .await?
        .into_iter()
        .filter_map(|(font, url)| {
            let url = url?;
            let format = font
                .serving_asset()
                .map(|a| css_format_for_key(&a.storage_key))
                .unwrap_or("truetype");
            Some(FontFaceRule {
                family: font.display_name().to_string(),
                src_url: url,
                format,
                weight: font.font.weight.clone(),
                style: font.font.style.clone(),
            })
        })
        .collect();

    let body = css::render_stylesheet(&rules);
    Ok((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        body,
    ))
}

/// One entry in the JSON embed manifest.
#[derive(Debug, Serialize)]
pub struct EmbedFont {
    pub id: DbId,
    pub name: String,
    pub full_name: String,
    pub style: String,
    pub weight: String,
    pub license: String,
    pub url: Option<String>,
}

/// GET /projects/{slug}/embed
///
/// The manifest as JSON, for clients that build their own CSS.
pub async fn project_embed(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<EmbedFont>>> {
    let project = find_by_slug(&state, &slug).await?;
    let fonts = FontRepo::list_by_project(&state.pool, project.id).await?;

    let entries = presign_members(&state, fonts)
        .await?
        .into_iter()
        .map(|(font, url)| EmbedFont {
            id: font.font.id,
            name: font.display_name().to_string(),
            full_name: font.font.full_name.clone(),
            style: font.font.style.clone(),
            weight: font.font.weight.clone(),
            license: font.font.license.clone(),
            url,
        })
        .collect();

    Ok(Json(entries))
}

/// Query half of an HMAC-signed asset URL.
#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    pub expires: i64,
    pub sig: String,
}

/// GET /assets/{*key}?expires=...&sig=...
///
/// Serves a blob after verifying the HMAC signature the URL was issued
/// with. Backs the memory-store presigned URLs; the S3 backend issues
/// SDK-presigned URLs that never hit this route.
pub async fn serve_asset(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<SignedQuery>,
) -> AppResult<impl IntoResponse> {
    state
        .signer
        .verify(&key, query.expires, &query.sig)
        .map_err(|err| AppError::Core(CoreError::Forbidden(err.to_string())))?;

    let body = state
        .store
        .get(&key)
        .await?
        .ok_or(CoreError::NotFoundByKey {
            entity: "Asset",
            key,
        })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, body.content_type),
            (header::CACHE_CONTROL, "private, max-age=60".to_string()),
        ],
        body.bytes,
    ))
}

async fn find_by_slug(
    state: &AppState,
    slug: &str,
) -> AppResult<typevault_db::models::project::Project> {
    Ok(ProjectRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "Project",
            key: slug.to_string(),
        })?)
}

/// Issue a fresh signed URL per member font, concurrently. Fonts with
/// no stored asset map to `None`.
async fn presign_members(
    state: &AppState,
    fonts: Vec<FontWithAssets>,
) -> Result<Vec<(FontWithAssets, Option<String>)>, StorageError> {
    let ttl = state.config.signed_url_ttl();
    stream::iter(fonts.into_iter().map(|font| async move {
        let url = match font.serving_asset() {
            Some(asset) => Some(state.store.presign_get(&asset.storage_key, ttl).await?),
            None => None,
        };
        Ok::<_, StorageError>((font, url))
    }))
    .buffered(PRESIGN_FANOUT)
    .try_collect()
    .await
}

/// Map a storage key's extension onto a CSS format hint.
fn css_format_for_key(key: &str) -> &'static str {
    key.rsplit_once('.')
        .and_then(|(_, ext)| FontFormat::from_extension(ext))
        .map(FontFormat::css_format)
        .unwrap_or("truetype")
}
