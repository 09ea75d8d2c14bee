//! Object store gateway and signed URL issuance.
//!
//! The [`ObjectStore`] trait is the durable blob-storage port: put,
//! get, delete (idempotent), exists, prefix listing, and presigned
//! read-URL issuance. Two backends are provided: [`S3Store`] for
//! production (SDK presigned GETs) and [`MemoryStore`] for tests and
//! local development, whose presigned URLs are HMAC-signed by
//! [`UrlSigner`] and served back through the API's `/assets/{key}`
//! route.

pub mod error;
pub mod memory;
pub mod s3;
pub mod signer;
pub mod store;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use s3::S3Store;
pub use signer::{SignatureError, UrlSigner};
pub use store::{ObjectBody, ObjectStore};
