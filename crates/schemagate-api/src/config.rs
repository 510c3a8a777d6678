//! Service configuration.
//!
//! Read once at startup from environment variables. Every variable has a
//! default except `DATABASE_URL`, whose absence selects the in-memory store.

use std::fmt;
use std::str::FromStr;

use schemagate_admission::AdmissionPolicy;
use schemagate_store::PoolConfig;

/// Default request body limit (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

/// Runtime configuration for the HTTP service.
///
/// Custom `Debug` implementation redacts `database_url`, which usually
/// carries credentials.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_max_connections: u32,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    /// Reject non-strict schemas at registration as well as at submission.
    pub strict_registration: bool,
    /// Install the Prometheus recorder and serve `/metrics`.
    pub metrics_enabled: bool,
    /// Log output format.
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("database_max_connections", &self.database_max_connections)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("strict_registration", &self.strict_registration)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            database_max_connections: PoolConfig::default().max_connections,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            strict_registration: false,
            metrics_enabled: true,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `DATABASE_URL` (optional)
    /// - `DATABASE_MAX_CONNECTIONS` (default: 20)
    /// - `MAX_BODY_BYTES` (default: 2097152)
    /// - `SCHEMAGATE_STRICT_REGISTRATION` (default: false)
    /// - `METRICS_ENABLED` (default: true)
    /// - `LOG_FORMAT` (`text` or `json`, default: text)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            port: parse_or("PORT", &lookup, defaults.port)?,
            database_url,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                &lookup,
                defaults.database_max_connections,
            )?,
            max_body_bytes: parse_or("MAX_BODY_BYTES", &lookup, defaults.max_body_bytes)?,
            strict_registration: flag_or(
                "SCHEMAGATE_STRICT_REGISTRATION",
                &lookup,
                defaults.strict_registration,
            )?,
            metrics_enabled: flag_or("METRICS_ENABLED", &lookup, defaults.metrics_enabled)?,
            log_format: match lookup("LOG_FORMAT") {
                Some(raw) => raw.parse()?,
                None => defaults.log_format,
            },
        })
    }

    /// The admission policy this configuration selects.
    pub fn admission_policy(&self) -> AdmissionPolicy {
        AdmissionPolicy {
            strict_on_register: self.strict_registration,
        }
    }

    /// Pool settings for the Postgres store.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.database_max_connections,
            ..PoolConfig::default()
        }
    }
}

fn parse_or<T: FromStr>(
    var: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            var: var.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn flag_or(
    var: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var: var.to_string(),
            value: raw,
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid numeric value for {var}: {value:?}")]
    InvalidNumber { var: String, value: String },
    #[error("invalid boolean value for {var}: {value:?}")]
    InvalidFlag { var: String, value: String },
    #[error("invalid LOG_FORMAT {0:?}, expected \"text\" or \"json\"")]
    InvalidLogFormat(String),
}
