//! Repository for the `fonts` and `font_assets` tables.
//!
//! Holds no business logic beyond the registry invariants: a font row
//! and its asset rows are created in one transaction (only after the
//! blobs were stored), and rows are only removed after blob deletion
//! succeeded.

use std::collections::HashMap;

use sqlx::PgPool;
use typevault_core::types::DbId;

use crate::models::font::{Font, FontAsset, FontWithAssets, NewFont, NewFontAsset};

/// Column list shared across `fonts` queries.
const FONT_COLUMNS: &str = "\
    id, file_name, family, full_name, postscript_name, style, weight, \
    copyright, version, manufacturer, designer, description, license, \
    owner_id, project_id, created_at, updated_at";

/// Column list shared across `font_assets` queries.
const ASSET_COLUMNS: &str = "id, font_id, kind, storage_key, content_type, position";

/// Provides CRUD operations for fonts and their stored assets.
pub struct FontRepo;

impl FontRepo {
    /// Insert a font row plus its asset rows in one transaction.
    ///
    /// Callers must only invoke this after every referenced blob was
    /// stored successfully; the UNIQUE constraint on `storage_key`
    /// rejects key collisions.
    pub async fn create(
        pool: &PgPool,
        input: &NewFont,
        assets: &[NewFontAsset],
    ) -> Result<FontWithAssets, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO fonts (\
                file_name, family, full_name, postscript_name, style, weight, \
                copyright, version, manufacturer, designer, description, license, \
                owner_id\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {FONT_COLUMNS}"
        );
        let meta = &input.metadata;
        let font = sqlx::query_as::<_, Font>(&query)
            .bind(&input.file_name)
            .bind(&meta.family)
            .bind(&meta.full_name)
            .bind(&meta.postscript_name)
            .bind(&meta.style)
            .bind(&meta.weight)
            .bind(&meta.copyright)
            .bind(&meta.version)
            .bind(&meta.manufacturer)
            .bind(&meta.designer)
            .bind(&meta.description)
            .bind(&meta.license)
            .bind(input.owner_id)
            .fetch_one(&mut *tx)
            .await?;

        let asset_query = format!(
            "INSERT INTO font_assets (font_id, kind, storage_key, content_type, position) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ASSET_COLUMNS}"
        );
        let mut stored_assets = Vec::with_capacity(assets.len());
        for (position, asset) in assets.iter().enumerate() {
            let stored = sqlx::query_as::<_, FontAsset>(&asset_query)
                .bind(font.id)
                .bind(asset.kind)
                .bind(&asset.storage_key)
                .bind(&asset.content_type)
                .bind(position as i16)
                .fetch_one(&mut *tx)
                .await?;
            stored_assets.push(stored);
        }

        tx.commit().await?;

        Ok(FontWithAssets {
            font,
            assets: stored_assets,
        })
    }

    /// Find a font (with assets) by id, scoped to its owner.
    pub async fn find_by_id_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<FontWithAssets>, sqlx::Error> {
        let query = format!("SELECT {FONT_COLUMNS} FROM fonts WHERE id = $1 AND owner_id = $2");
        let font = sqlx::query_as::<_, Font>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await?;

        match font {
            Some(font) => {
                let assets = Self::assets_for(pool, font.id).await?;
                Ok(Some(FontWithAssets { font, assets }))
            }
            None => Ok(None),
        }
    }

    /// List all fonts owned by a user, newest first, with assets.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<FontWithAssets>, sqlx::Error> {
        let query = format!(
            "SELECT {FONT_COLUMNS} FROM fonts WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let fonts = sqlx::query_as::<_, Font>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await?;

        Self::attach_assets(pool, fonts).await
    }

    /// List a project's member fonts in stored association order
    /// (no implied priority beyond insertion order).
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<FontWithAssets>, sqlx::Error> {
        let query = format!(
            "SELECT {FONT_COLUMNS} FROM fonts WHERE project_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        let fonts = sqlx::query_as::<_, Font>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await?;

        Self::attach_assets(pool, fonts).await
    }

    /// Set or clear a font's project association. Scoped to the owner.
    ///
    /// This is a single-row update: concurrent associations on the same
    /// project are commutative, and conflicting updates to the same
    /// font are last-write-wins.
    pub async fn set_project(
        pool: &PgPool,
        font_id: DbId,
        owner_id: DbId,
        project_id: Option<DbId>,
    ) -> Result<Option<Font>, sqlx::Error> {
        let query = format!(
            "UPDATE fonts SET project_id = $3, updated_at = now() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {FONT_COLUMNS}"
        );
        sqlx::query_as::<_, Font>(&query)
            .bind(font_id)
            .bind(owner_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a font row (asset rows cascade). Returns `true` if a row
    /// was removed. Callers must delete the blobs first.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM fonts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every storage key referenced by the registry. Used by the
    /// reconciliation sweep.
    pub async fn list_all_asset_keys(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT storage_key FROM font_assets ORDER BY storage_key")
            .fetch_all(pool)
            .await
    }

    async fn assets_for(pool: &PgPool, font_id: DbId) -> Result<Vec<FontAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {ASSET_COLUMNS} FROM font_assets WHERE font_id = $1 ORDER BY position"
        );
        sqlx::query_as::<_, FontAsset>(&query)
            .bind(font_id)
            .fetch_all(pool)
            .await
    }

    /// Batch-load assets for a list of fonts, preserving font order.
    async fn attach_assets(
        pool: &PgPool,
        fonts: Vec<Font>,
    ) -> Result<Vec<FontWithAssets>, sqlx::Error> {
        if fonts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = fonts.iter().map(|f| f.id).collect();
        let query = format!(
            "SELECT {ASSET_COLUMNS} FROM font_assets \
             WHERE font_id = ANY($1) ORDER BY font_id, position"
        );
        let assets = sqlx::query_as::<_, FontAsset>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_font: HashMap<DbId, Vec<FontAsset>> = HashMap::new();
        for asset in assets {
            by_font.entry(asset.font_id).or_default().push(asset);
        }

        Ok(fonts
            .into_iter()
            .map(|font| {
                let assets = by_font.remove(&font.id).unwrap_or_default();
                FontWithAssets { font, assets }
            })
            .collect())
    }
}
