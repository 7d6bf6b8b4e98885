use crate::config::{CHAIN_RESET_METHOD, JSONRPC_VERSION, METHOD_SEPARATOR};
use crate::error::{constants, ProtocolError, Result};
use crate::rpc::envelope::{RpcRequest, RpcResponse};
use crate::rpc::registry::{HandlerOutcome, ModuleRegistry};
use crate::utils::metrics::Metrics;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Control-plane request dispatcher.
///
/// `execute` runs steps sequentially per request with no suspension and
/// captures every failure before the envelope is finalized; nothing
/// escapes past this boundary.
pub struct RpcServer {
    registry: ModuleRegistry,
    metrics: Arc<Metrics>,
}

impl RpcServer {
    pub fn new(registry: ModuleRegistry) -> Self {
        Self {
            registry,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The key entry point for all incoming requests.
    pub fn execute(&self, request: &RpcRequest) -> RpcResponse {
        self.metrics.request_dispatched();
        debug!(method = %request.method, "dispatching rpc request");

        match self.try_execute(request) {
            Ok(result) => RpcResponse::success(request, result),
            Err(err) => {
                self.metrics.request_failed(&err);
                debug!(method = %request.method, error = %err, "rpc request failed");
                RpcResponse::failure(request, err.to_string())
            }
        }
    }

    /// Accept a raw JSON request string and return the JSON response
    /// string. Unparseable requests produce an error envelope with a
    /// null id.
    pub fn execute_raw(&self, raw: &str) -> String {
        let response = match serde_json::from_str::<RpcRequest>(raw) {
            Ok(request) => self.execute(&request),
            Err(err) => RpcResponse {
                id: Value::Null,
                jsonrpc: JSONRPC_VERSION.to_string(),
                result: None,
                error: Some(format!("Invalid request: {err}")),
            },
        };

        serde_json::to_string(&response).unwrap_or_else(|err| {
            // Response structs serialize infallibly in practice; keep a
            // well-formed envelope even if that ever changes.
            format!(r#"{{"id":null,"jsonrpc":"2.0","error":"Serialization error: {err}"}}"#)
        })
    }

    fn try_execute(&self, request: &RpcRequest) -> Result<Value> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(ProtocolError::UnsupportedProtocol(request.jsonrpc.clone()));
        }

        let (module_name, operation) = split_method(&request.method)?;

        let module = self
            .registry
            .resolve(module_name)
            .ok_or_else(|| ProtocolError::ModuleNotFound(module_name.to_string()))?;

        let handler = module
            .resolve(operation)
            .ok_or_else(|| ProtocolError::MethodNotImplemented(request.method.clone()))?;

        // One snapshot for the whole request, even if a reset lands
        // concurrently.
        let chain = self.registry.chain()?;

        let outcome = handler(&chain, &request.params)
            .map_err(|err| ProtocolError::handler_fault(&request.method, &err.to_string()))?;

        match (request.method == CHAIN_RESET_METHOD, outcome) {
            (false, HandlerOutcome::Value(value)) => Ok(value),

            // The designated administrative method replaces the shared
            // chain state from its own result, then reports plain
            // success. Fail-closed: a failed replacement suppresses the
            // success marker.
            (true, HandlerOutcome::ReplaceChain(new_state)) => {
                self.registry.replace_shared_state(new_state)?;
                self.metrics.chain_reset();
                info!("shared chain state replaced via {CHAIN_RESET_METHOD}");
                Ok(Value::Bool(true))
            }

            (true, HandlerOutcome::Value(_)) => Err(ProtocolError::handler_fault(
                &request.method,
                constants::ERR_RESET_NO_STATE,
            )),

            // No other method may mutate cross-module shared state.
            (false, HandlerOutcome::ReplaceChain(_)) => Err(ProtocolError::handler_fault(
                &request.method,
                constants::ERR_RESET_OUTSIDE_ADMIN,
            )),
        }
    }
}

/// Parse `<module>_<operation>`.
///
/// Exactly two non-empty separator-free tokens are accepted. This is a
/// security invariant, not a convenience check: lookups only ever
/// resolve two tokens, so no internally-named operation containing a
/// separator is reachable through dispatch.
fn split_method(method: &str) -> Result<(&str, &str)> {
    let mut pieces = method.split(METHOD_SEPARATOR);
    match (pieces.next(), pieces.next(), pieces.next()) {
        (Some(module), Some(operation), None) if !module.is_empty() && !operation.is_empty() => {
            Ok((module, operation))
        }
        _ => Err(ProtocolError::InvalidMethodName(method.to_string())),
    }
}
