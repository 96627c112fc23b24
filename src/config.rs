// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for both binaries.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing or empty
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. Appropriate for non-critical tuning parameters
/// where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Reads an optional string environment variable with a default.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Server configuration facade
// ============================================================

/// Aggregated configuration for `valentine-server`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: database::DatabaseConfig,

    /// Path of the `id,password` seed file.
    pub credentials_path: PathBuf,

    /// Socket address the HTTP API listens on.
    pub bind_addr: String,

    /// `prom` selects Prometheus metrics; anything else disables them.
    pub metrics_type: String,
}

impl ServerConfig {
    /// Loads and validates server configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            database: database::DatabaseConfig::from_env()?,
            credentials_path: PathBuf::from(optional_env!(
                "VALENTINE_CREDENTIALS_PATH",
                "ids_passwords.txt"
            )),
            bind_addr: optional_env!("VALENTINE_BIND_ADDR", "127.0.0.1:8000"),
            metrics_type: optional_env!("VALENTINE_METRICS_TYPE", "noop"),
        })
    }
}

// ============================================================
// Database configuration
// ============================================================

mod database {
    // ---
    use super::*;

    /// Database-related configuration derived from environment variables.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// PostgreSQL connection string.
        pub database_url: String,

        /// Number of attempts when initializing the database connection. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a connection from the pool. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Minimum number of connections to keep in the pool, even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections open concurrently. Defaults to 15.
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `DATABASE_URL` is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("VALENTINE_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs =
                optional_env_parse!("VALENTINE_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("VALENTINE_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("VALENTINE_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }
}
pub use database::DatabaseConfig;

// ============================================================
// Bot configuration
// ============================================================

mod bot {
    // ---
    use super::*;

    /// Configuration for `valentine-bot`.
    #[derive(Clone)]
    pub struct BotConfig {
        /// Telegram bot token. Required.
        pub token: String,

        /// Base URL of the valentine HTTP API.
        pub api_base_url: String,

        /// Per-request timeout for API calls. Defaults to 10 seconds.
        pub api_timeout: Duration,

        /// Idle time after which an unfinished conversation is discarded. Defaults to 1 hour.
        pub session_ttl: Duration,

        /// Redis URL for conversation sessions; in-memory when unset.
        pub session_redis_url: Option<String>,

        /// Telegram Bot API root.
        pub telegram_api_url: String,

        /// Long-poll timeout for `getUpdates`. Defaults to 30 seconds.
        pub poll_timeout: Duration,
    }

    // Hand-written so the token never ends up in logs.
    impl std::fmt::Debug for BotConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            // ---
            f.debug_struct("BotConfig")
                .field("token", &"<redacted>")
                .field("api_base_url", &self.api_base_url)
                .field("api_timeout", &self.api_timeout)
                .field("session_ttl", &self.session_ttl)
                .field("session_redis_url", &self.session_redis_url)
                .field("telegram_api_url", &self.telegram_api_url)
                .field("poll_timeout", &self.poll_timeout)
                .finish()
        }
    }

    impl BotConfig {
        /// Builds a [`BotConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `BOT_TOKEN` is missing; the bot cannot start without it.
        pub fn from_env() -> Result<Self> {
            // ---
            let token = required_env!("BOT_TOKEN");
            let api_base_url = optional_env!("API_BASE_URL", "http://localhost:8000");
            let api_timeout_secs = optional_env_parse!("VALENTINE_API_TIMEOUT_SEC", u64, 10);
            let session_ttl_secs = optional_env_parse!("VALENTINE_SESSION_TTL_SEC", u64, 3600);
            let session_redis_url = std::env::var("VALENTINE_SESSION_REDIS_URL")
                .ok()
                .filter(|v| !v.trim().is_empty());
            let telegram_api_url = optional_env!("TELEGRAM_API_URL", "https://api.telegram.org");
            let poll_timeout_secs = optional_env_parse!("VALENTINE_POLL_TIMEOUT_SEC", u64, 30);

            Ok(Self {
                token,
                api_base_url: api_base_url.trim_end_matches('/').to_string(),
                api_timeout: Duration::from_secs(api_timeout_secs),
                session_ttl: Duration::from_secs(session_ttl_secs),
                session_redis_url,
                telegram_api_url: telegram_api_url.trim_end_matches('/').to_string(),
                poll_timeout: Duration::from_secs(poll_timeout_secs),
            })
        }
    }
}
pub use bot::BotConfig;

// ============================================================
// Tests
// ============================================================
