//! # Error Types
//!
//! Comprehensive error handling for the node protocol core.
//!
//! This module defines all error variants that can occur while routing
//! control-plane requests or decoding data-plane messages, from malformed
//! wire buffers to RPC resolution failures.
//!
//! ## Error Categories
//! - **RPC Errors**: Version gating, method grammar, module/method resolution
//! - **Handler Errors**: Faults raised inside registered handlers
//! - **Codec Errors**: Malformed or truncated peer messages
//! - **Configuration Errors**: File and TOML parsing failures
//!
//! All errors implement `std::error::Error` for interoperability. Every
//! variant is recoverable: failures are scoped to a single request or a
//! single decode call and never escape the dispatch/codec boundary as an
//! unstructured fault.

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Registry-related error messages
    pub const ERR_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on chain state";
    pub const ERR_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on chain state";

    /// Chain-reset errors
    pub const ERR_RESET_NO_STATE: &str = "Chain reset did not produce a replacement state";
    pub const ERR_RESET_OUTSIDE_ADMIN: &str =
        "Only the designated administrative method may replace the shared chain state";

    /// Handler parameter validation errors
    pub const ERR_MISSING_PARAM: &str = "Missing required parameter";
    pub const ERR_PARAM_TYPE: &str = "Parameter has the wrong type";

    /// Wire decode errors
    pub const ERR_TRAILING_BYTES: &str = "Trailing bytes after fully decoded message";
    pub const ERR_EMPTY_LIST: &str = "List field requires at least one element";
}

// ProtocolError is the primary error type for all protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Request carried a protocol version other than the supported one.
    #[error("Only the 2.0 jsonrpc protocol is supported (got '{0}')")]
    UnsupportedProtocol(String),

    /// Method name did not match the `<module>_<operation>` grammar.
    /// Rejecting every other token count guarantees that no internal
    /// name containing a separator is reachable through dispatch.
    #[error("Invalid RPC method: '{0}'")]
    InvalidMethodName(String),

    #[error("Module unavailable: '{0}'")]
    ModuleNotFound(String),

    #[error("Method not implemented: '{0}'")]
    MethodNotImplemented(String),

    /// A registered handler failed. The message already carries the
    /// method name and the handler-supplied detail, if any.
    #[error("{0}")]
    HandlerFault(String),

    /// Parameter validation failure inside a handler. Wrapped into a
    /// `HandlerFault` at the dispatch boundary.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// A peer message buffer could not be decoded. Decode never returns
    /// a partial message alongside this error.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl ProtocolError {
    /// Wrap a handler failure, appending the handler-supplied message
    /// when it is non-empty.
    pub fn handler_fault(method: &str, detail: &str) -> Self {
        if detail.is_empty() {
            ProtocolError::HandlerFault(format!("Handler fault in '{method}'"))
        } else {
            ProtocolError::HandlerFault(format!("Handler fault in '{method}' - {detail}"))
        }
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
