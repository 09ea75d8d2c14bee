use std::sync::Arc;

use tokio::sync::Semaphore;
use typevault_db::DbPool;
use typevault_storage::{ObjectStore, UrlSigner};

use crate::config::ServerConfig;

/// Shared application state, cloned into every handler.
///
/// All fields are cheap to clone (`Arc`s and a pool handle).
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: DbPool,
    /// Server configuration loaded at startup.
    pub config: Arc<ServerConfig>,
    /// Object store backend (S3 in production, in-memory in tests).
    pub store: Arc<dyn ObjectStore>,
    /// HMAC signer backing `/assets/{key}` URLs on the memory backend.
    pub signer: Arc<UrlSigner>,
    /// Caps concurrent font transcodes; conversion is CPU-bound.
    pub transcode_permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: ServerConfig,
        store: Arc<dyn ObjectStore>,
        signer: Arc<UrlSigner>,
    ) -> Self {
        let transcode_permits = Arc::new(Semaphore::new(config.max_concurrent_transcodes));
        Self {
            pool,
            config: Arc::new(config),
            store,
            signer,
            transcode_permits,
        }
    }
}
