//! Accepted font file formats and their derived properties.
//!
//! The upload path trusts the file extension; there is deliberately no
//! magic-byte sniffing (matching the reference behaviour -- a corrupt
//! stream with a valid extension is accepted and stored with default
//! metadata).

use crate::error::CoreError;

/// Extensions accepted by the upload endpoint, lowercase.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["ttf", "otf", "eot", "woff", "woff2"];

/// A font container format, derived from the uploaded file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    Ttf,
    Otf,
    Eot,
    Woff,
    Woff2,
}

impl FontFormat {
    /// Parse a bare extension (no dot), case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ttf" => Some(Self::Ttf),
            "otf" => Some(Self::Otf),
            "eot" => Some(Self::Eot),
            "woff" => Some(Self::Woff),
            "woff2" => Some(Self::Woff2),
            _ => None,
        }
    }

    /// Derive the format from a file name, rejecting unsupported
    /// extensions with a [`CoreError::Validation`].
    pub fn from_file_name(file_name: &str) -> Result<Self, CoreError> {
        file_name
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unsupported font file '{file_name}'. Accepted extensions: {}",
                    ACCEPTED_EXTENSIONS.join(", ")
                ))
            })
    }

    /// Canonical lowercase extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ttf => "ttf",
            Self::Otf => "otf",
            Self::Eot => "eot",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
        }
    }

    /// MIME type used when storing the blob.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Ttf => "font/ttf",
            Self::Otf => "font/otf",
            Self::Eot => "application/vnd.ms-fontobject",
            Self::Woff => "font/woff",
            Self::Woff2 => "font/woff2",
        }
    }

    /// Format hint for a CSS `src: url(...) format(...)` clause.
    pub fn css_format(self) -> &'static str {
        match self {
            Self::Ttf => "truetype",
            Self::Otf => "opentype",
            Self::Eot => "embedded-opentype",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
        }
    }

    /// Whether the format is already a compressed web-delivery format.
    pub fn is_web_format(self) -> bool {
        matches!(self, Self::Woff | Self::Woff2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_supported_extension_case_insensitively() {
        for ext in ACCEPTED_EXTENSIONS {
            assert!(FontFormat::from_extension(ext).is_some());
            assert!(FontFormat::from_extension(&ext.to_uppercase()).is_some());
            assert!(FontFormat::from_file_name(&format!("MyFont.{ext}")).is_ok());
        }
    }

    #[test]
    fn rejects_unsupported_extensions() {
        assert!(FontFormat::from_file_name("font.svg").is_err());
        assert!(FontFormat::from_file_name("font.ttf.exe").is_err());
        assert!(FontFormat::from_file_name("no-extension").is_err());
        assert!(FontFormat::from_file_name("").is_err());
    }

    #[test]
    fn woff_variants_are_web_formats() {
        assert!(FontFormat::Woff.is_web_format());
        assert!(FontFormat::Woff2.is_web_format());
        assert!(!FontFormat::Ttf.is_web_format());
        assert!(!FontFormat::Otf.is_web_format());
        assert!(!FontFormat::Eot.is_web_format());
    }
}
