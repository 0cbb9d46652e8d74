//! Wirebind Client Implementation

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wirebind_core::domain::{ErrorEnvelope, Route, JSON_CONTENT_TYPE};

use crate::error::{Result, SdkError};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Wirebind RPC Client
///
/// Calls procedures over `POST /rpc/{app}/{procedure}`.
///
/// # Example
///
/// ```no_run
/// use wirebind_sdk::RpcClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RpcClient::new("http://127.0.0.1:9530")?;
/// let value = client
///     .call_raw("example-test", "health", &serde_json::json!({}))
///     .await?;
/// println!("{value}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RpcClient {
    base_url: String,
    http: reqwest::Client,
}

impl RpcClient {
    /// Create a client for `base_url` (e.g., `http://127.0.0.1:9530`)
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SdkError::InvalidUrl(base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a procedure. Names are kebab-cased like the server does.
    pub fn url_for(&self, app: &str, procedure: &str) -> String {
        format!("{}{}", self.base_url, Route::path_for(app, procedure))
    }

    /// Call a procedure with typed input and output
    pub async fn call<I, O>(&self, app: &str, procedure: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = serde_json::to_vec(input)?;
        let bytes = self.post(app, procedure, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Call a procedure with untyped JSON
    pub async fn call_raw(&self, app: &str, procedure: &str, input: &Value) -> Result<Value> {
        self.call(app, procedure, input).await
    }

    /// Send a pre-encoded body and return the raw success body
    pub async fn post(&self, app: &str, procedure: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let response = self
            .http
            .post(self.url_for(app, procedure))
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        Err(rpc_error(status.as_u16(), &bytes))
    }
}

/// Decode an error envelope; non-envelope bodies are kept verbatim
fn rpc_error(status: u16, body: &[u8]) -> SdkError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => SdkError::Rpc {
            status,
            kind: envelope.error.kind,
            message: envelope.error.message,
        },
        Err(_) => SdkError::Rpc {
            status,
            kind: "http".to_string(),
            message: String::from_utf8_lossy(body).into_owned(),
        },
    }
}
