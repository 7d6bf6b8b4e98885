//! JSON request/response envelopes.
//!
//! `id` and `jsonrpc` are opaque: the dispatcher echoes them verbatim
//! into the response and never interprets the id. A response carries
//! exactly one of `result`/`error`; the constructors are the only way
//! to build one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An inbound RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,

    /// Protocol version string. Absent means unversioned and fails the
    /// version gate.
    #[serde(default)]
    pub jsonrpc: String,

    pub method: String,

    #[serde(default)]
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            id: id.into(),
            jsonrpc: crate::config::JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }
}

/// An outbound RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: Value,

    pub jsonrpc: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RpcResponse {
    /// Successful envelope echoing the request identity.
    pub fn success(request: &RpcRequest, result: Value) -> Self {
        Self {
            id: request.id.clone(),
            jsonrpc: request.jsonrpc.clone(),
            result: Some(result),
            error: None,
        }
    }

    /// Failure envelope echoing the request identity.
    pub fn failure(request: &RpcRequest, error: impl Into<String>) -> Self {
        Self {
            id: request.id.clone(),
            jsonrpc: request.jsonrpc.clone(),
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}
