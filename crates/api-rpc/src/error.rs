//! HTTP Error Mapping
//!
//! Maps dispatch results to HTTP responses. Status policy lives in
//! `wirebind_core::DispatchError`; this module only translates.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use wirebind_core::domain::ErrorEnvelope;
use wirebind_core::{DispatchError, RpcResponse};

/// Server lifecycle errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server terminated: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Server task failed: {0}")]
    Join(String),
}

/// Convert a core response into an axum response
pub fn into_http_response(resp: RpcResponse) -> Response {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = resp.content_type();
    (status, [(header::CONTENT_TYPE, content_type)], resp.body).into_response()
}

pub fn error_response(err: &DispatchError) -> Response {
    into_http_response(RpcResponse::from_error(err))
}

/// Response for a procedure exceeding the configured request timeout
pub fn timeout_response() -> Response {
    let body = ErrorEnvelope::new("timeout", "request timed out").to_bytes();
    (
        StatusCode::REQUEST_TIMEOUT,
        [(header::CONTENT_TYPE, wirebind_core::domain::JSON_CONTENT_TYPE)],
        body,
    )
        .into_response()
}
