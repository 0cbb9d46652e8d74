//! HTTP Server
//!
//! Mounts every procedure of a `Registry` as a `POST` route on an axum router
//! and serves it over TCP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wirebind_core::Registry;

use crate::error::ServerError;
use crate::handler;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9530;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl RpcServerConfig {
    /// Defaults overridden by `WIREBIND_HOST`, `WIREBIND_PORT` and
    /// `WIREBIND_REQUEST_TIMEOUT_SECS`. Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("WIREBIND_HOST").unwrap_or(defaults.host);

        let port: u16 = std::env::var("WIREBIND_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let request_timeout = std::env::var("WIREBIND_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            host,
            port,
            request_timeout,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    registry: Arc<Registry>,
    extra: Router,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, registry: Arc<Registry>) -> Self {
        Self {
            config,
            registry,
            extra: Router::new(),
        }
    }

    /// Serve additional routes next to the procedures
    pub fn merge(mut self, routes: Router) -> Self {
        self.extra = self.extra.merge(routes);
        self
    }

    pub fn config(&self) -> &RpcServerConfig {
        &self.config
    }

    /// Router with one `POST` route per procedure plus the merged routes.
    /// Other methods on a procedure path get 405; unknown paths get 404.
    pub fn router(&self) -> Router {
        let timeout = self.config.request_timeout;
        let mut router = Router::new();

        for (route, dispatch) in self.registry.all_routes() {
            debug!(path = %route.path, procedure = %route.procedure_name, "Mounting procedure");
            router = router.route(
                &route.path,
                post(
                    move |uri: Uri, method: Method, headers: HeaderMap, body: Bytes| {
                        let dispatch = dispatch.clone();
                        async move {
                            handler::dispatch(dispatch, timeout, uri, method, headers, body).await
                        }
                    },
                ),
            );
        }

        router.merge(self.extra.clone()).fallback(handler::not_found)
    }

    /// Bind and serve in the background
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            app = %self.registry.app_name(),
            procedures = self.registry.len(),
            "Starting RPC server"
        );

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let router = self.router();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(addr = %local_addr, "RPC server started successfully");

        Ok(ServerHandle {
            local_addr,
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

/// Handle to a running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    /// Actual bound address (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL for clients, e.g. `http://127.0.0.1:9530`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            if tx.send(()).is_err() {
                warn!("RPC server already stopped");
            }
        }
        let result = (&mut self.task)
            .await
            .map_err(|e| ServerError::Join(e.to_string()))?;
        info!(addr = %self.local_addr, "RPC server stopped");
        result.map_err(ServerError::from)
    }
}
