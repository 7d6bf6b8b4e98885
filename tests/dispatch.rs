//! Integration tests for the control-plane dispatcher
//!
//! Covers the version gate, the method-name security invariant, module
//! and operation resolution, handler fault capture, and the chain-reset
//! special case.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use node_protocol::config::RpcConfig;
use node_protocol::protocol::message::{Block, Root};
use node_protocol::rpc::modules::{
    debug_module, eth_module, memory_chain_factory, standard_registry, MemoryChain,
};
use node_protocol::rpc::registry::HandlerOutcome;
use node_protocol::rpc::{Module, ModuleRegistry, RpcRequest, RpcServer};
use serde_json::{json, Value};
use std::sync::Arc;

fn test_server() -> RpcServer {
    let chain = Arc::new(
        MemoryChain::new(64, Root([7; 32]))
            .with_finalized(2, Root([1; 32]))
            .with_block(5, Root([5; 32]), Block::new(vec![0xAA, 0xBB])),
    );
    let config = RpcConfig {
        expose_debug_module: true,
    };
    RpcServer::new(standard_registry(chain, memory_chain_factory(), &config))
}

fn request(method: &str, params: Vec<Value>) -> RpcRequest {
    RpcRequest::new(1, method, params)
}

#[test]
fn dispatches_to_a_registered_handler() {
    let server = test_server();
    let response = server.execute(&request("eth_blockNumber", vec![]));
    assert_eq!(response.result, Some(json!(64)));
    assert_eq!(response.error, None);
    assert_eq!(response.id, json!(1));
}

#[test]
fn params_are_applied_positionally() {
    let server = test_server();

    let root = Root([5; 32]).to_string();
    let response = server.execute(&request("eth_getBlockByHash", vec![json!(root)]));
    assert_eq!(response.result, Some(json!("0xaabb")));

    let response = server.execute(&request("eth_getBlockByNumber", vec![json!(5)]));
    assert_eq!(response.result, Some(json!("0xaabb")));

    // Unknown root resolves to null, not an error.
    let response = server.execute(&request(
        "eth_getBlockByHash",
        vec![json!(Root([9; 32]).to_string())],
    ));
    assert_eq!(response.result, Some(Value::Null));
}

#[test]
fn rejects_unsupported_protocol_version_and_echoes_identity() {
    let server = test_server();
    let mut req = request("eth_blockNumber", vec![]);
    req.jsonrpc = "1.0".to_string();
    req.id = json!("keep-me");

    let response = server.execute(&req);
    assert_eq!(response.id, json!("keep-me"));
    assert_eq!(response.jsonrpc, "1.0");
    assert!(response.result.is_none());
    let error = response.error.expect("error must be set");
    assert!(error.contains("2.0 jsonrpc protocol"));
}

#[test]
fn method_grammar_is_a_security_invariant() {
    let server = test_server();

    // Zero or more than one separator never reaches module resolution:
    // the error names the method, not a module.
    for method in ["foo", "a_b_c", "eth__blockNumber", "eth_block_Number", ""] {
        let response = server.execute(&request(method, vec![]));
        let error = response.error.expect("must fail");
        assert!(
            error.contains("Invalid RPC method"),
            "{method:?} produced {error:?}"
        );
    }
}

#[test]
fn unknown_module_is_reported_with_its_name() {
    let server = test_server();
    let response = server.execute(&request("shh_version", vec![]));
    assert_eq!(
        response.error.as_deref(),
        Some("Module unavailable: 'shh'")
    );
}

#[test]
fn unregistered_operation_is_not_implemented() {
    let server = test_server();
    let response = server.execute(&request("eth_coinbase", vec![]));
    assert_eq!(
        response.error.as_deref(),
        Some("Method not implemented: 'eth_coinbase'")
    );
}

#[test]
fn internal_helpers_are_unreachable() {
    // MemoryChain has plenty of inherent methods; none are registered,
    // so none resolve. Resolution consults only the whitelist map.
    let server = test_server();
    for method in ["eth_resolve", "debug_chain", "eth_snapshot"] {
        let response = server.execute(&request(method, vec![]));
        assert!(
            response.error.as_deref().unwrap().starts_with("Method not implemented"),
            "{method:?} must not resolve"
        );
    }
}

#[test]
fn handler_faults_carry_method_and_detail() {
    let server = test_server();
    let response = server.execute(&request("eth_getBlockByHash", vec![]));
    let error = response.error.expect("must fail");
    assert!(error.starts_with("Handler fault in 'eth_getBlockByHash'"));
    assert!(error.contains("Missing required parameter"));
}

#[test]
fn reset_chain_replaces_state_for_every_module() {
    let server = test_server();

    let response = server.execute(&request(
        "debug_resetChainTo",
        vec![json!({"head_slot": 4096})],
    ));
    assert_eq!(response.result, Some(json!(true)));

    // Every module observes the new state afterwards.
    let response = server.execute(&request("eth_blockNumber", vec![]));
    assert_eq!(response.result, Some(json!(4096)));

    let response = server.execute(&request("debug_getChainHead", vec![]));
    let head = response.result.expect("head");
    assert_eq!(head["head_slot"], json!(4096));
}

#[test]
fn failed_reset_is_fail_closed() {
    let server = test_server();

    let before = server.execute(&request("eth_blockNumber", vec![]));

    // The factory rejects the description; no success marker, and the
    // previous binding stays in place.
    let response = server.execute(&request(
        "debug_resetChainTo",
        vec![json!({"head_root": "not hex"})],
    ));
    assert!(response.result.is_none());
    assert!(response.error.expect("error").starts_with("Handler fault"));

    let after = server.execute(&request("eth_blockNumber", vec![]));
    assert_eq!(before.result, after.result);
}

#[test]
fn reset_requires_a_parameter() {
    let server = test_server();
    let response = server.execute(&request("debug_resetChainTo", vec![]));
    assert!(response.result.is_none());
    assert!(response.error.is_some());
}

#[test]
fn only_the_designated_method_may_replace_shared_state() {
    // A rogue module returning a replacement outside the admin method
    // is rejected and the shared state is untouched.
    let chain = Arc::new(MemoryChain::new(10, Root::ZERO));
    let mut registry = ModuleRegistry::new(chain);
    registry.register(eth_module());
    registry.register(Module::new("rogue").operation("takeover", |_chain, _params| {
        Ok(HandlerOutcome::ReplaceChain(Arc::new(MemoryChain::new(
            999,
            Root::ZERO,
        ))))
    }));
    let server = RpcServer::new(registry);

    let response = server.execute(&request("rogue_takeover", vec![]));
    assert!(response
        .error
        .expect("must fail")
        .contains("designated administrative method"));

    let response = server.execute(&request("eth_blockNumber", vec![]));
    assert_eq!(response.result, Some(json!(10)));
}

#[test]
fn debug_module_can_be_withheld() {
    let chain = Arc::new(MemoryChain::new(1, Root::ZERO));
    let config = RpcConfig {
        expose_debug_module: false,
    };
    let server = RpcServer::new(standard_registry(chain, memory_chain_factory(), &config));

    let response = server.execute(&request("debug_resetChainTo", vec![json!({})]));
    assert_eq!(
        response.error.as_deref(),
        Some("Module unavailable: 'debug'")
    );
}

#[test]
fn execute_raw_roundtrips_json_strings() {
    let server = test_server();

    let raw = r#"{"id": 3, "jsonrpc": "2.0", "method": "eth_syncing", "params": []}"#;
    let response: Value = serde_json::from_str(&server.execute_raw(raw)).unwrap();
    assert_eq!(response["id"], json!(3));
    assert_eq!(response["result"], json!(false));
    assert!(response.get("error").is_none());
}

#[test]
fn execute_raw_rejects_unparseable_requests() {
    let server = test_server();
    let response: Value = serde_json::from_str(&server.execute_raw("{not json")).unwrap();
    assert_eq!(response["id"], Value::Null);
    assert!(response["error"].as_str().unwrap().contains("Invalid request"));
}

#[test]
fn metrics_track_failure_classes() {
    let server = test_server();
    server.execute(&request("eth_blockNumber", vec![]));
    server.execute(&request("nope", vec![]));
    server.execute(&request("shh_version", vec![]));

    use std::sync::atomic::Ordering;
    let metrics = server.metrics();
    assert_eq!(metrics.requests_total.load(Ordering::Relaxed), 3);
    assert_eq!(metrics.requests_failed.load(Ordering::Relaxed), 2);
    assert_eq!(metrics.invalid_method_names.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.modules_not_found.load(Ordering::Relaxed), 1);
}

#[test]
fn debug_module_alone_still_enforces_the_whitelist() {
    let chain = Arc::new(MemoryChain::new(1, Root::ZERO));
    let mut registry = ModuleRegistry::new(chain);
    registry.register(debug_module(memory_chain_factory()));
    let server = RpcServer::new(registry);

    let response = server.execute(&request("debug_getChainHead", vec![]));
    assert!(response.result.is_some());

    let response = server.execute(&request("debug_setChain", vec![]));
    assert!(response
        .error
        .expect("must fail")
        .starts_with("Method not implemented"));
}
