//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub messaging: MessagingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Read `APP_ENV`, defaulting to development
    pub fn from_env() -> Self {
        env::var("APP_ENV")
            .ok()
            .and_then(|s| Self::parse(&s))
            .unwrap_or_default()
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply embedded migrations on startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Global request rate limiting
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Chat and messaging limits
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Posts (club or direct) allowed per user per minute
    #[serde(default = "default_post_throttle")]
    pub post_throttle_per_minute: u32,
    /// Default page size of a club feed
    #[serde(default = "default_club_feed_limit")]
    pub club_feed_limit: i64,
    /// Default page size of a conversation thread
    #[serde(default = "default_dm_feed_limit")]
    pub dm_feed_limit: i64,
    #[serde(default = "default_inbox_limit")]
    pub inbox_limit: i64,
    /// Unread notifications returned per request
    #[serde(default = "default_notification_limit")]
    pub notification_limit: i64,
    /// Events buffered per live topic before slow subscribers lag
    #[serde(default = "default_delivery_buffer")]
    pub delivery_buffer: usize,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            post_throttle_per_minute: default_post_throttle(),
            club_feed_limit: default_club_feed_limit(),
            dm_feed_limit: default_dm_feed_limit(),
            inbox_limit: default_inbox_limit(),
            notification_limit: default_notification_limit(),
            delivery_buffer: default_delivery_buffer(),
            heartbeat_interval_secs: default_heartbeat_interval(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "bookclub-chat".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_post_throttle() -> u32 {
    30
}

fn default_club_feed_limit() -> i64 {
    30
}

fn default_dm_feed_limit() -> i64 {
    50
}

fn default_inbox_limit() -> i64 {
    50
}

fn default_notification_limit() -> i64 {
    10
}

fn default_delivery_buffer() -> usize {
    256
}

fn default_heartbeat_interval() -> u64 {
    30
}

/// Read and parse an optional variable, falling back to `default`
fn var_or<T: FromStr>(key: &str, default: fn() -> T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(default)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: Environment::from_env(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("API_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: var_or("DATABASE_MAX_CONNECTIONS", default_max_connections),
                min_connections: var_or("DATABASE_MIN_CONNECTIONS", default_min_connections),
                run_migrations: var_or("DATABASE_RUN_MIGRATIONS", default_run_migrations),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: var_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: var_or(
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second,
                ),
                burst: var_or("RATE_LIMIT_BURST", default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
            messaging: MessagingConfig {
                post_throttle_per_minute: var_or("POST_THROTTLE_PER_MINUTE", default_post_throttle),
                club_feed_limit: var_or("CLUB_FEED_LIMIT", default_club_feed_limit),
                dm_feed_limit: var_or("DM_FEED_LIMIT", default_dm_feed_limit),
                inbox_limit: var_or("INBOX_LIMIT", default_inbox_limit),
                notification_limit: var_or("NOTIFICATION_LIMIT", default_notification_limit),
                delivery_buffer: var_or("DELIVERY_BUFFER", default_delivery_buffer),
                heartbeat_interval_secs: var_or(
                    "LIVE_HEARTBEAT_INTERVAL_SECS",
                    default_heartbeat_interval,
                ),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
