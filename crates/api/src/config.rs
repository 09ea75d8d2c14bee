use crate::auth::jwt::JwtConfig;

/// Which object store backend to run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Production: S3 bucket, SDK presigned URLs.
    S3 { bucket: String },
    /// Local development and tests: in-memory store, HMAC-signed URLs
    /// served back through `/assets/{key}`.
    Memory,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted upload size in bytes (default: 32 MiB).
    pub max_upload_bytes: usize,
    /// JWT validation configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Object store backend selection.
    pub storage_backend: StorageBackend,
    /// Public origin signed URLs are rooted at (memory backend).
    pub public_base_url: String,
    /// Secret for HMAC URL signatures (memory backend).
    pub url_signing_secret: String,
    /// Signed URL validity window in seconds (default: `3600`).
    pub signed_url_ttl_secs: u64,
    /// Upper bound on concurrent transcodes (default: CPU count).
    pub max_concurrent_transcodes: usize,
    /// Reconciliation sweep interval in seconds (default: `3600`).
    pub reconcile_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `MAX_UPLOAD_BYTES`          | `33554432`              |
    /// | `STORAGE_BACKEND`           | `memory`                |
    /// | `S3_BUCKET`                 | -- (required for `s3`)  |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:3000` |
    /// | `URL_SIGNING_SECRET`        | -- (**required**)       |
    /// | `SIGNED_URL_TTL_SECS`       | `3600`                  |
    /// | `MAX_CONCURRENT_TRANSCODES` | number of CPUs          |
    /// | `RECONCILE_INTERVAL_SECS`   | `3600`                  |
    ///
    /// # Panics
    ///
    /// Panics on missing secrets or unparseable numbers; startup
    /// misconfiguration should fail fast.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (32 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let storage_backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3 {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when STORAGE_BACKEND=s3"),
            },
            "memory" => StorageBackend::Memory,
            other => panic!("Unknown STORAGE_BACKEND '{other}'. Must be one of: s3, memory"),
        };

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let url_signing_secret = std::env::var("URL_SIGNING_SECRET")
            .expect("URL_SIGNING_SECRET must be set in the environment");
        assert!(
            !url_signing_secret.is_empty(),
            "URL_SIGNING_SECRET must not be empty"
        );

        let signed_url_ttl_secs: u64 = std::env::var("SIGNED_URL_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SIGNED_URL_TTL_SECS must be a valid u64");

        let max_concurrent_transcodes: usize = std::env::var("MAX_CONCURRENT_TRANSCODES")
            .ok()
            .map(|v| v.parse().expect("MAX_CONCURRENT_TRANSCODES must be a valid usize"))
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            });

        let reconcile_interval_secs: u64 = std::env::var("RECONCILE_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("RECONCILE_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            storage_backend,
            public_base_url,
            url_signing_secret,
            signed_url_ttl_secs,
            max_concurrent_transcodes,
            reconcile_interval_secs,
        }
    }

    /// Signed URL validity window as a `Duration`.
    pub fn signed_url_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.signed_url_ttl_secs)
    }
}
