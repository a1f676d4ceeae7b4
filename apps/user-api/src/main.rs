use axum_helpers::server::{create_production_app, health_router};
use core_config::load_dotenv;
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Values already in the environment win over the .env file
    load_dotenv();

    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.migrations_run {
        database::postgres::run_migrations::<Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;
    }

    if config.synchronize {
        if config.environment.is_production() {
            warn!("DB_SYNCHRONIZE is ignored in production; use DB_MIGRATIONS_RUN");
        } else {
            domain_users::sync_schema(&db)
                .await
                .map_err(|e| eyre::eyre!("Schema synchronisation failed: {}", e))?;
        }
    }

    let state = AppState { config, db };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(
        api_routes,
        &state.config.server,
        &state.config.environment,
    )?;

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check against the database
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting user API with graceful shutdown (30s timeout)");

    let server = state.config.server.clone();
    create_production_app(app, &server, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connections");
        database::postgres::close(state.db).await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("User API shutdown complete");
    Ok(())
}
