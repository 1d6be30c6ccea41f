use panchayat_core::validation::files::{
    FileLimits, DEFAULT_MAX_FILE_COUNT, DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_MAX_TOTAL_SIZE_BYTES,
};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT verification settings.
    pub jwt: JwtConfig,
    /// Upload ceilings applied to application attachments.
    pub file_limits: FileLimits,
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
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                    |
    /// | `MAX_FILE_SIZE_BYTES`       | `5242880` (5 MB)        |
    /// | `MAX_TOTAL_FILE_SIZE_BYTES` | `26214400` (25 MB)      |
    /// | `MAX_FILE_COUNT`            | `10`                    |
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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let file_limits = FileLimits {
            max_file_size_bytes: std::env::var("MAX_FILE_SIZE_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_BYTES.to_string())
                .parse()
                .expect("MAX_FILE_SIZE_BYTES must be a valid u64"),
            max_total_size_bytes: std::env::var("MAX_TOTAL_FILE_SIZE_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_TOTAL_SIZE_BYTES.to_string())
                .parse()
                .expect("MAX_TOTAL_FILE_SIZE_BYTES must be a valid u64"),
            max_file_count: std::env::var("MAX_FILE_COUNT")
                .unwrap_or_else(|_| DEFAULT_MAX_FILE_COUNT.to_string())
                .parse()
                .expect("MAX_FILE_COUNT must be a valid usize"),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            file_limits,
        }
    }
}
