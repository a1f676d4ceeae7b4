use super::shutdown::ShutdownCoordinator;
use crate::context::{TRACE_ID_HEADER, request_context};
use crate::docs::docs_router;
use crate::errors::handlers::{method_not_allowed, not_found};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
};
use core_config::{Environment, server::ServerConfig};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Assemble the application router around the API routes.
///
/// - documentation routes (see [`crate::docs`])
/// - `apis` nested under `/api`
/// - enveloped 404 fallback, and enveloped 405 for known paths with an
///   unsupported method
/// - request context (trace id, failure logging), HTTP tracing, compression
/// - CORS, only when `CORS_ALLOWED_ORIGIN` configured origins
///
/// `apis` must already have its state applied. Health routes are merged by
/// the app afterwards.
///
/// # Errors
/// Returns `InvalidInput` when a configured CORS origin is not a valid header
/// value.
pub fn create_router<T>(
    apis: Router,
    server_config: &ServerConfig,
    environment: &Environment,
) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let mut router = Router::new()
        .merge(docs_router::<T>(environment))
        .nest("/api", apis)
        .fallback(not_found)
        // Applies to the routes registered above, so it must follow them
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn(request_context))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    if let Some(origins) = &server_config.cors_allowed_origins {
        router = router.layer(cors_layer(origins)?);
        info!("CORS configured with allowed origins: {}", origins.join(","));
    }

    Ok(router.layer(CompressionLayer::new()))
}

fn cors_layer(origins: &[String]) -> io::Result<CorsLayer> {
    let allowed = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([HeaderName::from_static(TRACE_ID_HEADER)])
        .max_age(Duration::from_secs(3600)))
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup` within
/// `shutdown_timeout`.
///
/// Connect info is enabled so failure logs can name the client address.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_coordinator = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        cleanup_coordinator.wait_for_shutdown().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let signal_coordinator = coordinator.clone();
    let serve_result = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { signal_coordinator.wait_for_signal().await })
    .await
    .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    // Cleanup also runs when serving failed
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
