//! # Configuration Management
//!
//! Centralized configuration for the node protocol library.
//!
//! This module provides structured configuration for the RPC surface and
//! logging, plus the wire-format constants shared by the codec.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Security Considerations
//! - List-length ceilings bound decoder allocations before any element
//!   is read
//! - The debug module can be withheld from untrusted deployments

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The only JSON-RPC protocol version accepted by the dispatcher
pub const JSONRPC_VERSION: &str = "2.0";

/// Separator between the module and operation tokens of a method name
pub const METHOD_SEPARATOR: char = '_';

/// The administrative method permitted to replace the shared chain state
pub const CHAIN_RESET_METHOD: &str = "debug_resetChainTo";

/// Max elements accepted in any variable-length message field
pub const MAX_REQUEST_BLOCKS: usize = 1024;

/// Max byte length of a single serialized block payload (e.g. 4 MB)
pub const MAX_BLOCK_BYTES: usize = 4 * 1024 * 1024;

/// Main protocol configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProtocolConfig {
    /// RPC-surface configuration
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProtocolConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Start with defaults
        let mut config = Self::default();

        // Override with environment variables
        if let Ok(expose) = std::env::var("NODE_PROTOCOL_EXPOSE_DEBUG_MODULE") {
            if let Ok(val) = expose.parse::<bool>() {
                config.rpc.expose_debug_module = val;
            }
        }

        if let Ok(level) = std::env::var("NODE_PROTOCOL_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }
}

/// RPC-surface configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcConfig {
    /// Whether the `debug` module (including the chain-reset method) is
    /// registered. Untrusted deployments should leave this off.
    #[serde(default)]
    pub expose_debug_module: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            expose_debug_module: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Env-filter directive, e.g. "info" or "node_protocol=debug"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether log lines include the emitting module path
    #[serde(default)]
    pub show_target: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            show_target: false,
        }
    }
}
