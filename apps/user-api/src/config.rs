use core_config::{AppInfo, FromEnv, app_info, env_flag, env_or_default, server::ServerConfig};

// Import database configs from the database library
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// `DB_MIGRATIONS_RUN`: apply pending migrations on boot
    pub migrations_run: bool,
    /// `DB_SYNCHRONIZE`: create missing tables from the entity on boot
    pub synchronize: bool,
    /// Backend kind reported by `/api/sys/be_type`
    pub be_type: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DATABASE_URL or PG_* parts
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            migrations_run: env_flag("DB_MIGRATIONS_RUN", false)?,
            synchronize: env_flag("DB_SYNCHRONIZE", false)?,
            be_type: env_or_default("BE_TYPE", "rust"),
        })
    }
}
