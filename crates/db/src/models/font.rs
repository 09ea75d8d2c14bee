//! Font entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use typevault_core::metadata::FontMetadata;
use typevault_core::types::{DbId, Timestamp};

/// Asset kind: the uploaded binary, stored verbatim.
pub const KIND_ORIGINAL: &str = "original";

/// Asset kind: the transcoded web-delivery representation.
pub const KIND_WEB: &str = "web";

/// A font row from the `fonts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Font {
    pub id: DbId,
    pub file_name: String,
    pub family: String,
    pub full_name: String,
    pub postscript_name: String,
    pub style: String,
    pub weight: String,
    pub copyright: String,
    pub version: String,
    pub manufacturer: String,
    pub designer: String,
    pub description: String,
    pub license: String,
    pub owner_id: DbId,
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One stored representation of a font (original or web-optimized).
///
/// Modeled as an ordered list per font so additional representations
/// need no schema change.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FontAsset {
    pub id: DbId,
    pub font_id: DbId,
    pub kind: String,
    pub storage_key: String,
    pub content_type: String,
    pub position: i16,
}

/// A font together with its stored assets, ordered by `position`.
#[derive(Debug, Clone, Serialize)]
pub struct FontWithAssets {
    #[serde(flatten)]
    pub font: Font,
    pub assets: Vec<FontAsset>,
}

impl FontWithAssets {
    /// The asset to serve to browsers: web-optimized when present,
    /// otherwise the original.
    pub fn serving_asset(&self) -> Option<&FontAsset> {
        self.assets
            .iter()
            .find(|a| a.kind == KIND_WEB)
            .or_else(|| self.assets.iter().find(|a| a.kind == KIND_ORIGINAL))
    }

    /// `font-family` value: full name when present, else the family,
    /// else the original file name.
    pub fn display_name(&self) -> &str {
        if !self.font.full_name.is_empty() {
            &self.font.full_name
        } else if !self.font.family.is_empty() {
            &self.font.family
        } else {
            &self.font.file_name
        }
    }
}

/// Input for creating a font row.
#[derive(Debug, Clone)]
pub struct NewFont {
    pub file_name: String,
    pub metadata: FontMetadata,
    pub owner_id: DbId,
}

/// Input for one asset row attached to a new font.
#[derive(Debug, Clone)]
pub struct NewFontAsset {
    pub kind: &'static str,
    pub storage_key: String,
    pub content_type: String,
}

/// Body for the associate-font-with-project endpoint.
#[derive(Debug, Deserialize)]
pub struct AssociateFont {
    pub font_id: DbId,
}
