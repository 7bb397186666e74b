use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `180` -- the one-shot
    /// generation endpoint holds the request open across the whole poll
    /// loop).
    pub request_timeout_secs: u64,
    /// Upstream generation API base URL.
    pub bfl_api_base: String,
    /// Process-level default API key; requests may override it with an
    /// explicit `apiKey` field. `None` means callers must always supply
    /// their own.
    pub bfl_api_key: Option<String>,
    /// Directory for stored raster files (served at `/generated-images`).
    pub images_dir: PathBuf,
    /// Directory for per-image metadata documents.
    pub metadata_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `HOST`                 | `0.0.0.0`                   |
    /// | `PORT`                 | `3000`                      |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS` | `180`                       |
    /// | `BFL_API_BASE`         | `https://api.bfl.ai`        |
    /// | `BFL_API_KEY`          | *(unset)*                   |
    /// | `IMAGES_DIR`           | `public/generated-images`   |
    /// | `METADATA_DIR`         | `data/image-metadata`       |
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
            .unwrap_or_else(|_| "180".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let bfl_api_base =
            std::env::var("BFL_API_BASE").unwrap_or_else(|_| "https://api.bfl.ai".into());

        let bfl_api_key = std::env::var("BFL_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let images_dir = PathBuf::from(
            std::env::var("IMAGES_DIR").unwrap_or_else(|_| "public/generated-images".into()),
        );
        let metadata_dir = PathBuf::from(
            std::env::var("METADATA_DIR").unwrap_or_else(|_| "data/image-metadata".into()),
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            bfl_api_base,
            bfl_api_key,
            images_dir,
            metadata_dir,
        }
    }
}
