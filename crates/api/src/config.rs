use vantage_core::public_dashboard::MarkingCeilingMode;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Drain budget for background tasks after the listener closes.
    pub shutdown_timeout_secs: u64,
    /// Base URL of the external query engine.
    pub query_engine_url: String,
    /// Per-request timeout for engine calls.
    pub query_engine_timeout_secs: u64,
    /// Concurrent engine queries across all requests.
    pub query_max_concurrency: usize,
    /// Behaviour when a publication requests markings above the ceiling.
    pub marking_ceiling_mode: MarkingCeilingMode,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `HOST`                      | `0.0.0.0`                |
    /// | `PORT`                      | `4000`                   |
    /// | `CORS_ORIGINS`              | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                     |
    /// | `QUERY_ENGINE_URL`          | `http://localhost:9200`  |
    /// | `QUERY_ENGINE_TIMEOUT_SECS` | `30`                     |
    /// | `QUERY_MAX_CONCURRENCY`     | `4`                      |
    /// | `MARKING_CEILING_MODE`      | `enforce`                |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "4000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
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

        let query_engine_url = std::env::var("QUERY_ENGINE_URL")
            .unwrap_or_else(|_| "http://localhost:9200".into())
            .trim_end_matches('/')
            .to_string();

        let query_engine_timeout_secs: u64 = std::env::var("QUERY_ENGINE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("QUERY_ENGINE_TIMEOUT_SECS must be a valid u64");

        let query_max_concurrency: usize = std::env::var("QUERY_MAX_CONCURRENCY")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("QUERY_MAX_CONCURRENCY must be a valid usize");
        assert!(query_max_concurrency > 0, "QUERY_MAX_CONCURRENCY must be positive");

        let marking_ceiling_mode: MarkingCeilingMode = std::env::var("MARKING_CEILING_MODE")
            .unwrap_or_else(|_| "enforce".into())
            .parse()
            .unwrap_or_else(|e| panic!("MARKING_CEILING_MODE is invalid: {e}"));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            query_engine_url,
            query_engine_timeout_secs,
            query_max_concurrency,
            marking_ceiling_mode,
            jwt,
        }
    }
}
