//! Mapping of service errors onto HTTP responses
//!
//! Clients only ever see a short fixed message per error kind. The full
//! error, including any underlying cause, goes to the log.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::ModelError;
use crate::parser::ParseError;
use crate::renderer::RenderError;

pub const UNKNOWN_RENDER_TYPE: &str = "Unknown render type";
pub const INVALID_TABLE_HTML: &str = "Bad request - table_html must contain a single table element";
pub const TABLE_TOO_LARGE: &str = "Bad request - table_html is too large";
pub const INTERNAL_ERROR: &str = "Failed to process the request due to an internal error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Unknown render type: {0}")]
    UnknownRenderType(String),

    /// The blocking worker panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Model(_) => StatusCode::BAD_REQUEST,
            ApiError::Parse(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::UnknownRenderType(_) | ApiError::Render(RenderError::UnknownFormat(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Parse(_) | ApiError::Render(_) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Fixed, client-safe response body
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Model(err) => err.client_message(),
            ApiError::Parse(ParseError::TooLarge { .. }) => TABLE_TOO_LARGE.to_string(),
            ApiError::Parse(err) if err.is_client_error() => INVALID_TABLE_HTML.to_string(),
            ApiError::UnknownRenderType(_) | ApiError::Render(RenderError::UnknownFormat(_)) => {
                UNKNOWN_RENDER_TYPE.to_string()
            }
            ApiError::Parse(_) | ApiError::Render(_) | ApiError::Task(_) => {
                INTERNAL_ERROR.to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "request failed: {}", self);
        } else {
            warn!(status = status.as_u16(), "request rejected: {}", self);
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.client_message(),
        )
            .into_response()
    }
}
