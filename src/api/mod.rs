//! HTTP API
//!
//! Routes:
//!
//! - `POST /render/{render_type}`: render a JSON table as `html`, `xlsx` or `csv`
//! - `POST /parse/html`: convert an HTML table back to JSON plus a preview
//! - `GET /health`: liveness check

pub mod errors;
pub mod handlers;

pub use errors::ApiError;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::ServiceConfig;

/// Shared, immutable state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
}

/// Build the service router
pub fn router(config: Arc<ServiceConfig>) -> Router {
    let cors = cors_layer(&config);
    Router::new()
        .route("/render/{render_type}", post(handlers::render_table))
        .route("/parse/html", post(handlers::parse_table))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(AppState { config })
}

fn cors_layer(config: &ServiceConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderName::from_static("x-requested-with"),
        ]);

    if config.allows_any_origin() {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("ignoring invalid CORS origin '{}': {}", origin, err);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
