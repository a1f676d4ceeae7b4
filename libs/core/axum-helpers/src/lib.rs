//! # Axum Helpers
//!
//! Shared HTTP plumbing for the API services.
//!
//! - **[`response`]**: the `{code, message, data, traceId}` envelope
//! - **[`errors`]**: [`AppError`] and its normalisation into the envelope
//! - **[`context`]**: per-request trace id and failure logging middleware
//! - **[`extractors`]**: validated JSON body and integer path id
//! - **[`docs`]**: Swagger UI, raw OpenAPI JSON and alternative renderers
//! - **[`server`]**: router assembly, health checks, graceful shutdown

pub mod context;
pub mod docs;
pub mod errors;
pub mod extractors;
pub mod response;
pub mod server;

pub use context::{TRACE_ID_HEADER, current_trace_id, request_context};
pub use errors::{AppError, ErrorCode, ErrorReport};
pub use extractors::{FieldOrder, IdPath, ValidatedJson};
pub use response::{ApiResponse, EmptyResponse};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
