//! Route configuration

pub mod api;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use http::{HeaderName, Method, header::{AUTHORIZATION, CONTENT_TYPE}};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::api::health_check;
use crate::state::AppState;

/// CORS policy for browser clients: any origin, fixed preflight answer.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
        .allow_credentials(false)
}

/// Health check, media API, CORS and the upload size limit.
///
/// Rate limiting and security headers are added by the binary.
pub fn create_app(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health_check))
        .merge(api::create_api_router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors_layer())
}
