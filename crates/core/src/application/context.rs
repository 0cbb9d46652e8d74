// Request Context
//
// Per-request view handed to a procedure. Built from the raw inbound request,
// never shared between calls.

use std::collections::BTreeMap;

use crate::domain::RpcRequest;
use crate::port::{IdProvider, TimeProvider};

/// Header honoured as the caller-supplied request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub struct RequestContext {
    url: String,
    method: String,
    headers: BTreeMap<String, String>,
    request_id: String,
    received_at: i64,
}

impl RequestContext {
    pub fn from_request(
        request: &RpcRequest,
        id_provider: &dyn IdProvider,
        time_provider: &dyn TimeProvider,
    ) -> Self {
        let request_id = request
            .header(REQUEST_ID_HEADER)
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| id_provider.generate_id());

        Self {
            url: request.url.clone(),
            method: request.method.clone(),
            headers: request.headers.clone(),
            request_id,
            received_at: time_provider.now_millis(),
        }
    }

    /// Target URL of the request
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Receive time, epoch ms
    pub fn received_at(&self) -> i64 {
        self.received_at
    }
}
