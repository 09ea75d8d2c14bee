//! Domain logic for the typevault font service.
//!
//! Everything here is pure computation: font format validation,
//! naming-table metadata extraction, WOFF transcoding, storage key
//! generation, slug derivation, and `@font-face` stylesheet rendering.
//! No I/O -- persistence lives in `typevault-db`, blob storage in
//! `typevault-storage`.

pub mod css;
pub mod error;
pub mod format;
pub mod keys;
pub mod metadata;
pub mod slug;
pub mod transcode;
pub mod types;
