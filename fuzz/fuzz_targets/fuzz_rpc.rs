#![no_main]

use libfuzzer_sys::fuzz_target;
use node_protocol::config::RpcConfig;
use node_protocol::protocol::message::Root;
use node_protocol::rpc::modules::{memory_chain_factory, standard_registry, MemoryChain};
use node_protocol::RpcServer;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    // Fuzz the raw JSON entry point - the dispatcher must always return
    // a structured envelope, never panic
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let chain = Arc::new(MemoryChain::new(1, Root::ZERO));
    let config = RpcConfig {
        expose_debug_module: true,
    };
    let server = RpcServer::new(standard_registry(chain, memory_chain_factory(), &config));

    let response = server.execute_raw(raw);
    let parsed: serde_json::Value = serde_json::from_str(&response).expect("well-formed envelope");
    assert!(parsed.get("result").is_some() || parsed.get("error").is_some());
});
