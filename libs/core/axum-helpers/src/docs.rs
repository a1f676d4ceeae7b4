//! API documentation routes.
//!
//! - `/swagger` Swagger UI reading `/swagger.json`
//! - `/swagger.json` the raw OpenAPI document
//! - `/redoc`, `/scalar`, `/rapidoc` alternative renderers
//!
//! In production the document is generated once. Elsewhere `/swagger.json`
//! regenerates it on every fetch.

use axum::{Json, Router, routing::get};
use core_config::Environment;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::{Config, SwaggerUi};

pub const OPENAPI_JSON_PATH: &str = "/swagger.json";

pub fn docs_router<T>(environment: &Environment) -> Router
where
    T: OpenApi + 'static,
{
    let spec_route = if environment.is_production() {
        let document = Arc::new(T::openapi());
        get(move || {
            let document = Arc::clone(&document);
            async move { Json(document.as_ref().clone()) }
        })
    } else {
        get(|| async { Json(T::openapi()) })
    };

    Router::new()
        .merge(SwaggerUi::new("/swagger").config(Config::from(OPENAPI_JSON_PATH)))
        .route(OPENAPI_JSON_PATH, spec_route)
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
}
