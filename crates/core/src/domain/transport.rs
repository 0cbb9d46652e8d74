// Transport-neutral request/response
//
// The HTTP adapter converts its own request type into `RpcRequest` and the
// returned `RpcResponse` back. The core never sees transport internals.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Inbound request delivered by the transport
#[derive(Debug, Clone, Default)]
pub struct RpcRequest {
    /// Full target URL (or path when the host is unknown)
    pub url: String,
    pub method: String,
    /// Lowercased header names
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl RpcRequest {
    pub fn new(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            method: "POST".to_string(),
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Outbound response; the body is always JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RpcResponse {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn from_error(err: &DispatchError) -> Self {
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                kind: err.kind().to_string(),
                message: err.public_message(),
            },
        };
        Self {
            status: err.status(),
            body: envelope.to_bytes(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error body: `{"error": {"kind": "...", "message": "..."}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                kind: kind.into(),
                message: message.into(),
            },
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        // Two string fields cannot fail to serialize
        serde_json::to_vec(self).map(Bytes::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_envelope() {
        let resp = RpcResponse::from_error(&DispatchError::BadRequest("empty body".into()));
        assert_eq!(resp.status, 400);
        assert!(!resp.is_success());

        let envelope: ErrorEnvelope = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(envelope.error.kind, "bad_request");
        assert_eq!(envelope.error.message, "Bad request: empty body");
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let req = RpcRequest::new("/rpc/a/b", "{}").with_header("X-Request-Id", "abc");
        assert_eq!(req.header("x-request-id"), Some("abc"));
        assert_eq!(req.header("X-REQUEST-ID"), Some("abc"));
        assert_eq!(req.header("host"), None);
    }
}
