// Dispatch Handler - decode -> context -> invoke -> encode for one request

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error, info_span, warn, Instrument};

use super::context::RequestContext;
use super::procedure::Procedure;
use crate::domain::{RpcRequest, RpcResponse};
use crate::error::DispatchError;
use crate::port::{IdProvider, TimeProvider};

/// Per-procedure request/response boundary.
///
/// Cheap to clone; every clone shares the same read-only procedure.
#[derive(Clone)]
pub struct DispatchHandler {
    procedure: Arc<Procedure>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl DispatchHandler {
    pub fn new(
        procedure: Arc<Procedure>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            procedure,
            id_provider,
            time_provider,
        }
    }

    pub fn procedure_name(&self) -> &str {
        self.procedure.name()
    }

    /// Handle one request. Never fails: every error becomes a response.
    pub async fn call(&self, request: RpcRequest) -> RpcResponse {
        match self.try_call(request).await {
            Ok(body) => RpcResponse::ok(body),
            Err(err) => {
                if err.is_client_error() {
                    warn!(procedure = %self.procedure.name(), error = %err, "Rejected RPC request");
                } else {
                    error!(procedure = %self.procedure.name(), error = %err, "RPC procedure failed");
                }
                RpcResponse::from_error(&err)
            }
        }
    }

    /// Handle one request, returning the encoded output or the typed error.
    pub async fn try_call(&self, request: RpcRequest) -> Result<Bytes, DispatchError> {
        // 1. Body must be present
        if request.body.iter().all(u8::is_ascii_whitespace) {
            return Err(DispatchError::BadRequest("Request body is empty".to_string()));
        }

        // 2. Decode against the declared input type
        let handler = self.procedure.handler();
        let input = handler.decode(&request.body)?;

        // 3. Per-request context
        let ctx = RequestContext::from_request(
            &request,
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
        );

        let span = info_span!(
            "dispatch",
            procedure = %self.procedure.name(),
            request_id = %ctx.request_id()
        );

        // 4-5. Invoke and encode
        async move {
            let body = handler.invoke(ctx, input).await?;
            debug!(bytes = body.len(), "RPC procedure completed");
            Ok(body)
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for DispatchHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchHandler")
            .field("procedure", &self.procedure.name())
            .finish()
    }
}
