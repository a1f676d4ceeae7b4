use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_flag, env_or_default, env_parse_or};

/// PostgreSQL connection and pool settings
///
/// Built manually with [`PostgresConfig::new`] or, with the `config` feature,
/// loaded from the environment.
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// Log every statement sea-orm sends
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Assemble a URL from discrete connection parts.
    pub fn from_parts(host: &str, port: u16, user: &str, password: &str, database: &str) -> Self {
        let credentials = if password.is_empty() {
            user.to_string()
        } else {
            format!("{}:{}", user, password)
        };

        Self::new(format!(
            "postgres://{}@{}:{}/{}",
            credentials, host, port, database
        ))
    }

    pub fn with_pool_size(mut self, max_connections: u32, min_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = min_connections;
        self
    }

    pub fn with_sqlx_logging(mut self, enabled: bool) -> Self {
        self.sqlx_logging = enabled;
        self
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(&self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(LevelFilter::Debug);
        opt
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL with the password replaced, safe for logs
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let Some((credentials, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        match credentials.split_once(':') {
            Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
            None => self.url.clone(),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 20,
            min_connections: 1,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
            sqlx_logging: false,
        }
    }
}

/// Environment variables:
/// - `DATABASE_URL` - full connection string; when unset the URL is built from
///   `PG_HOST` (localhost), `PG_PORT` (5432), `PG_USER` (postgres),
///   `PG_PASSWORD` (empty) and `PG_DATABASE` (postgres)
/// - `DB_MAX_CONNECTIONS` (20), `DB_MIN_CONNECTIONS` (1)
/// - `DB_CONNECT_TIMEOUT_SECS` (8), `DB_ACQUIRE_TIMEOUT_SECS` (8)
/// - `DB_IDLE_TIMEOUT_SECS` (300), `DB_MAX_LIFETIME_SECS` (1800)
/// - `DB_LOGGING` (false)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::from_parts(
                &env_or_default("PG_HOST", "localhost"),
                env_parse_or("PG_PORT", 5432)?,
                &env_or_default("PG_USER", "postgres"),
                &env_or_default("PG_PASSWORD", ""),
                &env_or_default("PG_DATABASE", "postgres"),
            ),
        };

        Ok(Self {
            max_connections: env_parse_or("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_parse_or("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout_secs: env_parse_or(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            acquire_timeout_secs: env_parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            )?,
            idle_timeout_secs: env_parse_or("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
            max_lifetime_secs: env_parse_or("DB_MAX_LIFETIME_SECS", defaults.max_lifetime_secs)?,
            sqlx_logging: env_flag("DB_LOGGING", defaults.sqlx_logging)?,
            ..base
        })
    }
}
