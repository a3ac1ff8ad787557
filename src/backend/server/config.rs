/**
 * Server Configuration
 *
 * Loads `AppConfig` from environment variables (after `dotenv`), with
 * defaults suited to local development.
 *
 * # Variables
 *
 * | variable | default |
 * |---|---|
 * | `DATABASE_URL` | unset: in-memory store |
 * | `DATABASE_MAX_CONNECTIONS` | 10 |
 * | `SERVER_HOST` | 0.0.0.0 |
 * | `SERVER_PORT` | 3000 |
 * | `JWT_SECRET` | development secret (logged warning) |
 * | `TOKEN_TTL_DAYS` | 30 (at most 3650) |
 * | `STATUS_TTL_HOURS` | 24 (at most 8760) |
 * | `PUBLIC_BASE_URL` | http://localhost:3000 |
 * | `CORS_ORIGIN` | unset: any origin |
 * | `REQUIRE_EMAIL_VERIFICATION` | true |
 * | `BCRYPT_COST` | bcrypt `DEFAULT_COST` |
 */

use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "socialnet-development-secret-change-me";

/// Longest accepted `TOKEN_TTL_DAYS` (ten years)
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

/// Longest accepted `STATUS_TTL_HOURS` (one year)
pub const MAX_STATUS_TTL_HOURS: i64 = 24 * 365;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub status_ttl_hours: i64,
    /// Base for links written to the log (verification, password reset)
    pub public_base_url: String,
    pub cors_origin: Option<String>,
    pub require_email_verification: bool,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 10,
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_days: 30,
            status_ttl_hours: 24,
            public_base_url: "http://localhost:3000".to_string(),
            cors_origin: None,
            require_email_verification: true,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup; unset keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set. Using the development secret.");
                defaults.jwt_secret
            }
        };

        let config = Self {
            database_url: get("DATABASE_URL"),
            database_max_connections: parse(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse(&get, "SERVER_PORT", defaults.server_port)?,
            jwt_secret,
            token_ttl_days: parse(&get, "TOKEN_TTL_DAYS", defaults.token_ttl_days)?,
            status_ttl_hours: parse(&get, "STATUS_TTL_HOURS", defaults.status_ttl_hours)?,
            public_base_url: get("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
            cors_origin: get("CORS_ORIGIN"),
            require_email_verification: parse(
                &get,
                "REQUIRE_EMAIL_VERIFICATION",
                defaults.require_email_verification,
            )?,
            bcrypt_cost: parse(&get, "BCRYPT_COST", defaults.bcrypt_cost)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&self.token_ttl_days) {
            return Err(ConfigError::InvalidValue {
                key: "TOKEN_TTL_DAYS",
                value: self.token_ttl_days.to_string(),
            });
        }
        if !(1..=MAX_STATUS_TTL_HOURS).contains(&self.status_ttl_hours) {
            return Err(ConfigError::InvalidValue {
                key: "STATUS_TTL_HOURS",
                value: self.status_ttl_hours.to_string(),
            });
        }
        if self.database_max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                value: self.bcrypt_cost.to_string(),
            });
        }
        Ok(())
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::hours(self.status_ttl_hours)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Absolute link for a path such as `/api/auth/verify/{token}`
    pub fn link(&self, path: &str) -> String {
        format!("{}{}", self.public_base_url.trim_end_matches('/'), path)
    }
}

fn parse<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn server_port(mut self, port: u16) -> Self {
        self.config.server_port = port;
        self
    }

    pub fn token_ttl_days(mut self, days: i64) -> Self {
        self.config.token_ttl_days = days;
        self
    }

    pub fn status_ttl_hours(mut self, hours: i64) -> Self {
        self.config.status_ttl_hours = hours;
        self
    }

    pub fn public_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.public_base_url = url.into();
        self
    }

    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.cors_origin = Some(origin.into());
        self
    }

    pub fn require_email_verification(mut self, required: bool) -> Self {
        self.config.require_email_verification = required;
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
