//! Per-request trace id and failure logging.
//!
//! [`request_context`] gives every request a v4 trace id. The id is scoped to
//! the request task so envelopes built anywhere below the middleware pick it
//! up through [`current_trace_id`], and it is echoed in the `x-trace-id`
//! response header.

use crate::errors::ErrorReport;
use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::{error, warn};
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

tokio::task_local! {
    static TRACE_ID: Uuid;
}

/// Trace id of the request being served.
///
/// Outside [`request_context`] (unit tests, background work) a fresh id is
/// generated on every call.
pub fn current_trace_id() -> Uuid {
    TRACE_ID.try_with(|id| *id).unwrap_or_else(|_| Uuid::new_v4())
}

/// Client address: first `x-forwarded-for` hop, then `x-real-ip`, then the
/// socket peer when the server was started with connect info.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware assigning the trace id and logging every failed request.
pub async fn request_context(request: Request, next: Next) -> Response {
    let trace_id = Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_address(request.headers(), peer);

    let mut response = TRACE_ID.scope(trace_id, next.run(request)).await;

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        let status = response.status();
        if status.is_server_error() {
            error!(
                %method, %uri, client = %client, %trace_id,
                status = status.as_u16(), code = report.code.code(),
                detail = %report.detail,
                "HTTP_ERROR"
            );
        } else {
            warn!(
                %method, %uri, client = %client, %trace_id,
                status = status.as_u16(), code = report.code.code(),
                detail = %report.detail,
                "HTTP_ERROR"
            );
        }
    }

    if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ApiResponse;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[test]
    fn test_client_address_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));

        assert_eq!(client_address(&headers, None), "10.0.0.1");
    }

    #[test]
    fn test_client_address_falls_back_to_peer() {
        let peer: SocketAddr = "192.168.1.4:51000".parse().unwrap();
        assert_eq!(client_address(&HeaderMap::new(), Some(peer)), "192.168.1.4");
        assert_eq!(client_address(&HeaderMap::new(), None), "unknown");
    }

    #[test]
    fn test_trace_id_outside_request_is_fresh() {
        assert_ne!(current_trace_id(), current_trace_id());
    }

    #[tokio::test]
    async fn test_header_matches_envelope_trace_id() {
        let app = Router::new()
            .route("/ping", get(|| async { ApiResponse::success("pong") }))
            .layer(middleware::from_fn(request_context));

        let response = app
            .oneshot(HttpRequest::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["traceId"], header.as_str());
        assert_eq!(Uuid::parse_str(&header).unwrap().get_version_num(), 4);
    }
}
