//! Request Adapter
//!
//! Translates axum requests into core `RpcRequest`s and runs them through a
//! `DispatchHandler` under the configured timeout.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, Uri};
use axum::response::Response;
use tracing::warn;
use wirebind_core::{DispatchError, DispatchHandler, RpcRequest};

use crate::error::{error_response, into_http_response, timeout_response};

/// Build the core request from the pieces axum extracted.
///
/// Relative URIs are made absolute with the `Host` header. Non UTF-8 header
/// values are dropped; for repeated headers the last value wins.
pub fn to_rpc_request(uri: &Uri, method: &Method, headers: &HeaderMap, body: Bytes) -> RpcRequest {
    let url = match (uri.scheme(), headers.get(header::HOST).and_then(|h| h.to_str().ok())) {
        (None, Some(host)) => format!("http://{host}{uri}"),
        _ => uri.to_string(),
    };

    let mut request = RpcRequest::new(url, body);
    request.method = method.as_str().to_string();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }
    request
}

/// Handle one mounted route
pub async fn dispatch(
    handler: DispatchHandler,
    timeout: Duration,
    uri: Uri,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = to_rpc_request(&uri, &method, &headers, body);

    match tokio::time::timeout(timeout, handler.call(request)).await {
        Ok(resp) => into_http_response(resp),
        Err(_) => {
            warn!(
                procedure = %handler.procedure_name(),
                timeout_ms = timeout.as_millis() as u64,
                "RPC procedure timed out"
            );
            timeout_response()
        }
    }
}

/// Fallback for paths no procedure is mounted on
pub async fn not_found(uri: Uri) -> Response {
    error_response(&DispatchError::NotFound(uri.path().to_string()))
}
