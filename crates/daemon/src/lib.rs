//! Wirebind example server: procedures, configuration and logging setup.

pub mod config;
pub mod procedures;
pub mod telemetry;

pub use config::{DaemonConfig, LogFormat};
pub use procedures::{build_registry, homepage_routes, APP_NAME};
