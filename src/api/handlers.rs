//! Request handlers
//!
//! Rendering and parsing are synchronous and CPU-bound, so each request's
//! work runs on the blocking pool inside a span carrying its file name.

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{info, info_span};

use super::AppState;
use super::errors::ApiError;
use crate::models::{ModelError, ParseRequest, RenderRequest};
use crate::parser::parse_html;
use crate::renderer::RenderFormat;

const JSON_CONTENT_TYPE: &str = "application/json";

/// `POST /render/{render_type}`
pub async fn render_table(
    State(state): State<AppState>,
    Path(render_type): Path<String>,
    body: Body,
) -> Result<Response, ApiError> {
    let format: RenderFormat = render_type
        .parse()
        .map_err(|_| ApiError::UnknownRenderType(render_type.clone()))?;
    let body = read_body(body, state.config.max_body_bytes).await?;

    let output = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        let request = RenderRequest::from_slice(&body)?;
        let span = info_span!("render", file_name = %request.filename, render_type = %format);
        let _guard = span.enter();

        let output = format.render(&request)?;
        info!(response_bytes = output.len(), "rendered a table");
        Ok(output)
    })
    .await??;

    Ok(([(header::CONTENT_TYPE, format.content_type())], output).into_response())
}

/// `POST /parse/html`
pub async fn parse_table(State(state): State<AppState>, body: Body) -> Result<Response, ApiError> {
    let body = read_body(body, state.config.max_body_bytes).await?;

    let output = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        let request = ParseRequest::from_slice(&body)?;
        let span = info_span!("parse", file_name = %request.filename);
        let _guard = span.enter();

        let output = parse_html(&request)?;
        info!(response_bytes = output.len(), "parsed a table");
        Ok(output)
    })
    .await??;

    Ok(([(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], output).into_response())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, ApiError> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|err| ModelError::ReadingBody(std::io::Error::other(err)).into())
}
