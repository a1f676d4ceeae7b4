use utoipa::OpenApi;

use crate::api::sys::SysApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User API",
        version = "0.1.0",
        description = "User management API"
    ),
    nest(
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/api/sys", api = SysApiDoc)
    )
)]
pub struct ApiDoc;
