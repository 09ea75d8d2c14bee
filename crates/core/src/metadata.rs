//! Naming-table metadata extraction.
//!
//! Parses the descriptive name records embedded in a font binary.
//! Extraction is strictly best-effort: a malformed or unsupported
//! binary produces an all-default [`FontMetadata`] and a warning --
//! the caller always proceeds with storage.

use serde::{Deserialize, Serialize};
use ttf_parser::{name_id, Face};

/// Windows platform US-English language id. Preferred locale for
/// naming records; the first readable record is the fallback.
const WINDOWS_ENGLISH_US: u16 = 0x0409;

/// Descriptive metadata extracted from a font's naming table.
///
/// Every field has an explicit default so extraction failure degrades
/// predictably: empty strings everywhere, except `weight` which
/// defaults to `"normal"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontMetadata {
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
}

impl Default for FontMetadata {
    fn default() -> Self {
        Self {
            family: String::new(),
            full_name: String::new(),
            postscript_name: String::new(),
            style: String::new(),
            weight: "normal".to_string(),
            copyright: String::new(),
            version: String::new(),
            manufacturer: String::new(),
            designer: String::new(),
            description: String::new(),
            license: String::new(),
        }
    }
}

/// Extract naming-table metadata from a raw font binary. Never fails.
pub fn extract(data: &[u8], file_name: &str) -> FontMetadata {
    match parse(data) {
        Ok(metadata) => metadata,
        Err(err) => {
            tracing::warn!(
                file_name,
                error = %err,
                "Font naming table could not be parsed; storing default metadata"
            );
            FontMetadata::default()
        }
    }
}

fn parse(data: &[u8]) -> Result<FontMetadata, ttf_parser::FaceParsingError> {
    let face = Face::parse(data, 0)?;

    Ok(FontMetadata {
        family: name_string(&face, name_id::FAMILY).unwrap_or_default(),
        full_name: name_string(&face, name_id::FULL_NAME).unwrap_or_default(),
        postscript_name: name_string(&face, name_id::POST_SCRIPT_NAME).unwrap_or_default(),
        style: name_string(&face, name_id::SUBFAMILY).unwrap_or_default(),
        weight: face.weight().to_number().to_string(),
        copyright: name_string(&face, name_id::COPYRIGHT_NOTICE).unwrap_or_default(),
        version: name_string(&face, name_id::VERSION).unwrap_or_default(),
        manufacturer: name_string(&face, name_id::MANUFACTURER).unwrap_or_default(),
        designer: name_string(&face, name_id::DESIGNER).unwrap_or_default(),
        description: name_string(&face, name_id::DESCRIPTION).unwrap_or_default(),
        license: name_string(&face, name_id::LICENSE).unwrap_or_default(),
    })
}

/// Read one naming-table field, preferring the Windows US-English
/// record and falling back to the first decodable record for that id.
fn name_string(face: &Face, id: u16) -> Option<String> {
    let mut fallback = None;

    for name in face.names() {
        if name.name_id != id || !name.is_unicode() {
            continue;
        }
        let Some(value) = name.to_string() else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if name.language_id == WINDOWS_ENGLISH_US {
            return Some(value);
        }
        if fallback.is_none() {
            fallback = Some(value);
        }
    }

    fallback
}
