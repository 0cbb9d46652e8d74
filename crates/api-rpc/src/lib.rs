//! HTTP API Layer
//!
//! Serves a Wirebind `Registry` over HTTP with axum.
//! One `POST /rpc/{app}/{procedure}` route per registered procedure.

pub mod error;
pub mod handler;
pub mod server;

pub use error::ServerError;
pub use server::{RpcServer, RpcServerConfig, ServerHandle};
