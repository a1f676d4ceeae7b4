use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations. Safe to call
/// multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Resolve the log filter.
///
/// `RUST_LOG` wins when set. Otherwise `LOG_LEVEL` (a bare level such as
/// `debug`) is used, and failing that an environment default.
fn build_filter(environment: &Environment) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if let Ok(level) = std::env::var("LOG_LEVEL") {
        if let Ok(filter) = EnvFilter::try_new(level.trim()) {
            return filter;
        }
    }

    if environment.is_production() {
        EnvFilter::new("info,sea_orm=warn,sqlx=warn")
    } else {
        EnvFilter::new("debug,tower_http=debug,hyper=info")
    }
}

/// Initialize tracing with environment-aware output and error span capture.
///
/// - **Production** (`APP_ENV=production`): flattened JSON lines for log
///   aggregation, no module targets.
/// - **Development**: pretty, human-readable output.
///
/// Both install `tracing_error::ErrorLayer` so eyre reports carry span traces.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(environment: &Environment) {
    let filter = build_filter(environment);

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!("Tracing initialized. Environment: {:?}", environment),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_multiple_calls() {
        let env = Environment::Development;
        init_tracing(&env);
        init_tracing(&env);
        init_tracing(&Environment::Production);
    }

    #[test]
    fn test_build_filter_prefers_rust_log() {
        temp_env::with_vars([("RUST_LOG", Some("warn")), ("LOG_LEVEL", Some("trace"))], || {
            let filter = build_filter(&Environment::Development);
            assert_eq!(filter.to_string(), "warn");
        });
    }

    #[test]
    fn test_build_filter_falls_back_to_log_level() {
        temp_env::with_vars([("RUST_LOG", None), ("LOG_LEVEL", Some("trace"))], || {
            let filter = build_filter(&Environment::Production);
            assert_eq!(filter.to_string(), "trace");
        });
    }

    #[test]
    fn test_build_filter_environment_default() {
        temp_env::with_vars([("RUST_LOG", None::<&str>), ("LOG_LEVEL", None::<&str>)], || {
            let filter = build_filter(&Environment::Production);
            assert!(filter.to_string().contains("sea_orm=warn"));
        });
    }
}
