//! System information routes.

use axum::{Router, extract::State, routing::get};
use axum_helpers::ApiResponse;
use domain_users::BeType;
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(be_type_handler),
    components(schemas(BeType)),
    tags((name = "System", description = "Service information"))
)]
pub struct SysApiDoc;

pub fn router(be_type: String) -> Router {
    Router::new()
        .route("/be_type", get(be_type_handler))
        .with_state(Arc::<str>::from(be_type))
}

/// Backend implementation kind
#[utoipa::path(
    get,
    path = "/be_type",
    tag = "System",
    operation_id = "be_type",
    responses(
        (status = 200, description = "Backend kind", body = ApiResponse<BeType>)
    )
)]
async fn be_type_handler(State(be_type): State<Arc<str>>) -> ApiResponse<BeType> {
    ApiResponse::success(BeType {
        be_type: be_type.to_string(),
    })
}
