//! Storage key generation.
//!
//! Keys combine a wall-clock millisecond timestamp with a random
//! alphanumeric suffix, giving practically-unique keys without a
//! coordination service. The registry additionally enforces a UNIQUE
//! constraint on stored keys, so a collision fails loudly instead of
//! silently overwriting a blob.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Prefix shared by all font blobs in the object store. The
/// reconciliation sweep scans this prefix.
pub const KEY_PREFIX: &str = "fonts/";

/// Random suffix length: 62^12 ~ 3e21 values per millisecond.
const SUFFIX_LEN: usize = 12;

/// Generate a new storage key for a blob with the given extension.
///
/// Format: `fonts/{unix_millis}-{random}.{ext}`.
pub fn generate_storage_key(extension: &str) -> String {
    let stamp = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!("{KEY_PREFIX}{stamp}-{suffix}.{extension}")
}
