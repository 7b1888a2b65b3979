use rentdesk_core::image::MAX_IMAGE_BYTES;
use rentdesk_core::pricing::DEFAULT_DAILY_RATE;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// SQLite connection URL (default: `sqlite://rentdesk.db`).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal
    /// (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Largest accepted image upload in bytes (default: 5 MB).
    pub max_image_bytes: usize,
    /// Rate per day for cars without their own `dailyRate` (default: `50`).
    pub default_daily_rate: f64,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `5000`                   |
    /// | `DATABASE_URL`          | `sqlite://rentdesk.db`   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                     |
    /// | `MAX_IMAGE_BYTES`       | `5242880`                |
    /// | `DEFAULT_DAILY_RATE`    | `50`                     |
    /// | `LOG_FORMAT`            | `pretty` (or `json`)     |
    ///
    /// Panics on unparseable values: the server has nothing to run without
    /// a valid configuration.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://rentdesk.db".into());

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
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_image_bytes: usize = std::env::var("MAX_IMAGE_BYTES")
            .map(|v| v.parse().expect("MAX_IMAGE_BYTES must be a valid usize"))
            .unwrap_or(MAX_IMAGE_BYTES);

        let default_daily_rate: f64 = std::env::var("DEFAULT_DAILY_RATE")
            .map(|v| v.parse().expect("DEFAULT_DAILY_RATE must be a number"))
            .unwrap_or(DEFAULT_DAILY_RATE);
        assert!(
            default_daily_rate.is_finite() && default_daily_rate >= 0.0,
            "DEFAULT_DAILY_RATE must be non-negative"
        );

        let log_format = match std::env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_image_bytes,
            default_daily_rate,
            log_format,
        }
    }
}
