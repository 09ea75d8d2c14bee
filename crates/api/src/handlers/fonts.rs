//! Font upload, listing, and deletion.
//!
//! Upload ordering: blobs are stored before the registry row is
//! created, so a crash between the two leaves an orphan blob (swept by
//! the reconciliation job) but never a row pointing at a missing blob.
//! Deletion inverts the order: blobs first, row second.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use typevault_core::error::CoreError;
use typevault_core::format::FontFormat;
use typevault_core::metadata;
use typevault_core::transcode::{self, TranscodeOutcome};
use typevault_core::types::DbId;
use typevault_db::models::font::{FontWithAssets, NewFont, NewFontAsset, KIND_ORIGINAL, KIND_WEB};
use typevault_db::repositories::FontRepo;
use typevault_storage::StorageError;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Concurrent presign fan-out when annotating font lists.
const PRESIGN_FANOUT: usize = 8;

/// A font annotated with a freshly issued signed URL for its served
/// asset. `url` is absent only for a registry row with no assets.
#[derive(Debug, Serialize)]
pub struct FontResponse {
    #[serde(flatten)]
    pub font: FontWithAssets,
    pub url: Option<String>,
}

/// POST /api/v1/fonts/upload
///
/// Accepts a multipart form with one file field. The extension decides
/// acceptance; metadata extraction and transcoding are both
/// best-effort and never fail the upload.
pub async fn upload_font(
    user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let (file_name, data) = read_file_field(&mut multipart).await?;
    let format = FontFormat::from_file_name(&file_name)?;
    if data.is_empty() {
        return Err(CoreError::Validation("Uploaded font file is empty".into()).into());
    }

    let meta = metadata::extract(&data, &file_name);

    let web_bytes = transcode_for_web(&state, &data, format).await;

    // Original blob first; a put failure means no registry row at all.
    let original_key = typevault_core::keys::generate_storage_key(format.extension());
    state
        .store
        .put(&original_key, data, format.content_type())
        .await?;

    let mut new_assets = vec![NewFontAsset {
        kind: KIND_ORIGINAL,
        storage_key: original_key,
        content_type: format.content_type().to_string(),
    }];

    if let Some(woff) = web_bytes {
        let web_key = typevault_core::keys::generate_storage_key("woff");
        match state.store.put(&web_key, woff, "font/woff").await {
            Ok(()) => new_assets.push(NewFontAsset {
                kind: KIND_WEB,
                storage_key: web_key,
                content_type: "font/woff".to_string(),
            }),
            // The original is already durable; degrade to serving it.
            Err(err) => {
                tracing::warn!(error = %err, key = %web_key, "Storing web asset failed; serving original only")
            }
        }
    }

    let new_font = NewFont {
        file_name: file_name.clone(),
        metadata: meta,
        owner_id: user.user_id,
    };
    let created = match FontRepo::create(&state.pool, &new_font, &new_assets).await {
        Ok(created) => created,
        Err(err) => {
            // Registry insert failed after the blobs were stored. Best-effort
            // cleanup; anything left behind is picked up by the sweep.
            for asset in &new_assets {
                if let Err(del_err) = state.store.delete(&asset.storage_key).await {
                    tracing::error!(
                        error = %del_err,
                        key = %asset.storage_key,
                        "Orphan blob left behind for the reconciliation sweep"
                    );
                }
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        font_id = created.font.id,
        user_id = user.user_id,
        file_name = %file_name,
        assets = created.assets.len(),
        "Font uploaded"
    );

    let annotated = annotate_with_url(&state, created).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(annotated)),
    ))
}

/// GET /api/v1/fonts
///
/// All fonts owned by the caller, newest first, each annotated with a
/// fresh signed URL. URL issuance fans out concurrently.
pub async fn list_fonts(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<FontResponse>>>> {
    let fonts = FontRepo::list_by_owner(&state.pool, user.user_id).await?;

    let annotated: Vec<FontResponse> = stream::iter(
        fonts
            .into_iter()
            .map(|font| annotate_with_url(&state, font)),
    )
    .buffered(PRESIGN_FANOUT)
    .try_collect()
    .await?;

    Ok(Json(DataResponse::new(annotated)))
}

/// DELETE /api/v1/fonts/{id}
///
/// Blobs first, then the registry row: a failure in between leaves a
/// row whose retry is observable, never a dangling row-less blob set
/// that the registry has forgotten about. Repeating the call after
/// full success is a 404.
pub async fn delete_font(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let font = FontRepo::find_by_id_for_owner(&state.pool, id, user.user_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Font", id })?;

    for asset in &font.assets {
        state.store.delete(&asset.storage_key).await?;
    }

    FontRepo::delete(&state.pool, id).await?;

    tracing::info!(font_id = id, user_id = user.user_id, "Font deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Pull the first file field out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Malformed multipart body: {err}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("Failed to read upload: {err}")))?;
        return Ok((file_name, bytes.to_vec()));
    }

    Err(CoreError::Validation("Missing font file field in multipart body".into()).into())
}

/// Run the CPU-bound conversion on a blocking thread, bounded by the
/// transcode semaphore. Any failure is logged and swallowed.
async fn transcode_for_web(state: &AppState, data: &[u8], format: FontFormat) -> Option<Vec<u8>> {
    if format.is_web_format() {
        return None;
    }

    let permit = match state.transcode_permits.clone().acquire_owned().await {
        Ok(permit) => permit,
        // Semaphore closure only happens at shutdown.
        Err(_) => return None,
    };

    let bytes = data.to_vec();
    let joined = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        transcode::to_web_format(&bytes, format)
    })
    .await;

    match joined {
        Ok(Ok(TranscodeOutcome::Converted(woff))) => Some(woff),
        Ok(Ok(TranscodeOutcome::AlreadyWeb)) => None,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "Font conversion failed; serving original only");
            None
        }
        Err(err) => {
            tracing::error!(error = %err, "Font conversion task panicked");
            None
        }
    }
}

/// Issue a fresh signed URL for the font's served asset.
async fn annotate_with_url(
    state: &AppState,
    font: FontWithAssets,
) -> Result<FontResponse, StorageError> {
    let url = match font.serving_asset() {
        Some(asset) => Some(
            state
                .store
                .presign_get(&asset.storage_key, state.config.signed_url_ttl())
                .await?,
        ),
        None => None,
    };
    Ok(FontResponse { font, url })
}
