//! # node-protocol
//!
//! Protocol core for blockchain nodes: a control-plane RPC dispatcher
//! and a data-plane wire codec for peer synchronization messages.
//!
//! ## Features
//! - **RPC Dispatch**: Versioned `<module>_<operation>` routing onto
//!   whitelisted handler modules with structured error capture
//! - **Module Registry**: Named handler groups sharing one chain-state
//!   handle, swapped atomically by the designated admin method
//! - **Binary Codec**: Deterministic fixed/variable-length layout with
//!   byte-exact encode/decode round-trips
//! - **Message Catalog**: Handshake, goodbye, and block-sync
//!   request/response types
//!
//! Transport, consensus, and chain-state logic stay outside this crate:
//! the chain is an injectable [`rpc::ChainState`] collaborator and raw
//! peer bytes arrive from whatever session layer the embedder runs.
//!
//! ## Control plane
//! ```rust
//! use node_protocol::config::RpcConfig;
//! use node_protocol::protocol::message::Root;
//! use node_protocol::rpc::modules::{memory_chain_factory, standard_registry, MemoryChain};
//! use node_protocol::rpc::{RpcRequest, RpcServer};
//! use std::sync::Arc;
//!
//! let chain = Arc::new(MemoryChain::new(64, Root([7; 32])));
//! let config = RpcConfig { expose_debug_module: true };
//! let server = RpcServer::new(standard_registry(chain, memory_chain_factory(), &config));
//!
//! let response = server.execute(&RpcRequest::new(1, "eth_blockNumber", vec![]));
//! assert_eq!(response.result, Some(64u64.into()));
//! ```
//!
//! ## Data plane
//! ```rust
//! use node_protocol::protocol::message::{Goodbye, GoodbyeReason, MessageKind, SyncMessage};
//!
//! let message = SyncMessage::Goodbye(Goodbye::new(GoodbyeReason::ClientShutdown));
//! let bytes = message.encode()?;
//! assert_eq!(SyncMessage::decode(MessageKind::Goodbye, &bytes)?, message);
//! # Ok::<(), node_protocol::error::ProtocolError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod rpc;
pub mod utils;

pub use error::{ProtocolError, Result};
pub use protocol::message::{MessageKind, SyncMessage};
pub use rpc::{RpcRequest, RpcResponse, RpcServer};
