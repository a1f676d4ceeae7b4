use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use super::PostgresConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};

/// Open a pool from explicit sea-orm options.
pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Successfully connected to PostgreSQL database");
    Ok(db)
}

pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to {}", config.redacted_url());
    connect_with_options(config.into_connect_options()).await
}

/// Connect with exponential backoff, for services that may start before the
/// database accepts connections. `None` uses [`RetryConfig::default`].
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to {}", config.redacted_url());
    let options = config.into_connect_options();
    let attempt = || connect_with_options(options.clone());

    match retry_config {
        Some(policy) => retry_with_backoff(attempt, policy).await,
        None => retry(attempt).await,
    }
}

/// Apply every pending migration of `M`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DbErr> {
    info!("Running {} database migrations...", app_name);
    M::up(db, None).await?;
    info!("Migrations completed successfully for {}", app_name);
    Ok(())
}

/// Close the pool, logging instead of failing.
pub async fn close(db: DatabaseConnection) {
    match db.close().await {
        Ok(()) => info!("PostgreSQL connection pool closed"),
        Err(e) => warn!("Failed to close PostgreSQL pool cleanly: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_connect_with_retry_reports_last_error() {
        let mut config = PostgresConfig::new("postgres://nobody@127.0.0.1:1/none");
        config.connect_timeout_secs = 1;
        config.acquire_timeout_secs = 1;
        let policy = RetryConfig::new()
            .with_max_retries(1)
            .with_initial_delay(Duration::from_millis(1))
            .without_jitter();

        let result = connect_from_config_with_retry(config, Some(policy)).await;
        assert!(result.is_err());
    }
}
