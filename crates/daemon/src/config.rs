//! Daemon configuration from environment variables

use std::path::PathBuf;

use wirebind_api_rpc::RpcServerConfig;

const DEFAULT_BINDINGS_DIR: &str = "./rpc";

/// Log output format (`WIREBIND_LOG_FORMAT`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub server: RpcServerConfig,
    /// Root of the generated TypeScript tree
    pub bindings_dir: PathBuf,
    /// Generate bindings at startup
    pub generate: bool,
    pub log_format: LogFormat,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server: RpcServerConfig::default(),
            bindings_dir: PathBuf::from(DEFAULT_BINDINGS_DIR),
            generate: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bindings_dir = std::env::var("WIREBIND_BINDINGS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.bindings_dir);

        let generate = std::env::var("WIREBIND_GENERATE")
            .ok()
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.generate);

        let log_format = std::env::var("WIREBIND_LOG_FORMAT")
            .map(|s| LogFormat::parse(&s))
            .unwrap_or(defaults.log_format);

        Self {
            server: RpcServerConfig::from_env(),
            bindings_dir,
            generate,
            log_format,
        }
    }
}

/// `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`, case-insensitive
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
