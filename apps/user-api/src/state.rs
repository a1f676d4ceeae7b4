//! Application state management.

/// Shared application state.
///
/// Cloned into the routers that need it; the connection is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
}
