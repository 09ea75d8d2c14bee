//! Periodic registry/store reconciliation sweep.
//!
//! Compares every storage key the registry references against the keys
//! actually present under the `fonts/` prefix, and reports both kinds
//! of drift: rows pointing at missing blobs (a failed delete retried
//! later, or manual bucket surgery) and blobs no row references (a
//! crash between blob put and row insert). Report-only: nothing is
//! deleted automatically.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use typevault_core::keys::KEY_PREFIX;
use typevault_db::repositories::FontRepo;
use typevault_storage::{ObjectStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Registry query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store listing failed: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome of one sweep pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Registry rows whose blob is missing from the store.
    pub orphan_rows: Vec<String>,
    /// Stored blobs no registry row references.
    pub orphan_blobs: Vec<String>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_rows.is_empty() && self.orphan_blobs.is_empty()
    }
}

/// Run the reconciliation loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    store: Arc<dyn ObjectStore>,
    interval_secs: u64,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs, "Reconciliation sweep started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reconciliation sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&pool, store.as_ref()).await {
                    Ok(report) if report.is_clean() => {
                        tracing::debug!("Reconciliation sweep: registry and store agree");
                    }
                    Ok(report) => {
                        for key in &report.orphan_rows {
                            tracing::warn!(key = %key, "Registry row references a missing blob");
                        }
                        for key in &report.orphan_blobs {
                            tracing::warn!(key = %key, "Stored blob has no registry row");
                        }
                        tracing::warn!(
                            orphan_rows = report.orphan_rows.len(),
                            orphan_blobs = report.orphan_blobs.len(),
                            "Reconciliation sweep found drift"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Reconciliation sweep failed");
                    }
                }
            }
        }
    }
}

/// One sweep pass: set difference in both directions.
pub async fn sweep(pool: &PgPool, store: &dyn ObjectStore) -> Result<SweepReport, SweepError> {
    let registry: HashSet<String> = FontRepo::list_all_asset_keys(pool).await?.into_iter().collect();
    let stored: HashSet<String> = store.list_keys(KEY_PREFIX).await?.into_iter().collect();

    let mut orphan_rows: Vec<String> = registry.difference(&stored).cloned().collect();
    let mut orphan_blobs: Vec<String> = stored.difference(&registry).cloned().collect();
    orphan_rows.sort();
    orphan_blobs.sort();

    Ok(SweepReport {
        orphan_rows,
        orphan_blobs,
    })
}
