use criterion::{criterion_group, criterion_main, Criterion};
use node_protocol::config::RpcConfig;
use node_protocol::protocol::message::Root;
use node_protocol::rpc::modules::{memory_chain_factory, standard_registry, MemoryChain};
use node_protocol::rpc::{RpcRequest, RpcServer};
use serde_json::json;
use std::sync::Arc;

#[allow(clippy::unwrap_used)]
fn bench_dispatch(c: &mut Criterion) {
    let chain = Arc::new(MemoryChain::new(64, Root([7; 32])));
    let config = RpcConfig {
        expose_debug_module: true,
    };
    let server = RpcServer::new(standard_registry(chain, memory_chain_factory(), &config));

    let mut group = c.benchmark_group("rpc_dispatch");

    let query = RpcRequest::new(1, "eth_blockNumber", vec![]);
    group.bench_function("registered_method", |b| {
        b.iter(|| {
            let response = server.execute(&query);
            assert!(response.is_success());
        })
    });

    let invalid = RpcRequest::new(1, "a_b_c", vec![]);
    group.bench_function("invalid_method_name", |b| {
        b.iter(|| {
            let response = server.execute(&invalid);
            assert!(!response.is_success());
        })
    });

    let reset = RpcRequest::new(1, "debug_resetChainTo", vec![json!({"head_slot": 64})]);
    group.bench_function("chain_reset", |b| {
        b.iter(|| {
            let response = server.execute(&reset);
            assert!(response.is_success());
        })
    });

    let raw = r#"{"id": 1, "jsonrpc": "2.0", "method": "eth_syncing", "params": []}"#;
    group.bench_function("execute_raw", |b| {
        b.iter(|| server.execute_raw(raw))
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
