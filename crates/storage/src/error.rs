/// Errors surfaced by the object store gateway.
///
/// All variants are upstream failures and therefore retryable from the
/// caller's point of view; none of them indicate a bug in the request.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object store {operation} failed for key '{key}': {message}")]
    Upstream {
        operation: &'static str,
        key: String,
        message: String,
    },

    #[error("Failed to issue signed URL for key '{key}': {message}")]
    Presign { key: String, message: String },
}

impl StorageError {
    pub fn upstream(operation: &'static str, key: &str, err: impl std::fmt::Display) -> Self {
        Self::Upstream {
            operation,
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}
