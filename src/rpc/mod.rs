//! # Control-Plane RPC
//!
//! Versioned, string-named remote procedure calls routed onto
//! registered handler modules.
//!
//! ## Components
//! - **Envelope**: JSON request/response wrappers with verbatim echo
//! - **Registry**: named modules, whitelisted operations, shared chain
//!   handle
//! - **Dispatcher**: version gate, method grammar, structured error
//!   capture
//! - **Modules**: the built-in `eth` and `debug` handler groups
//!
//! ## Security
//! - Method names must be exactly `<module>_<operation>`; any other
//!   token count is rejected before resolution, so separator-bearing
//!   internal names are unreachable
//! - Only registered operations resolve; there is no reflective
//!   fallback
//! - Only the designated administrative method may replace the shared
//!   chain state

pub mod dispatcher;
pub mod envelope;
pub mod modules;
pub mod registry;

pub use dispatcher::RpcServer;
pub use envelope::{RpcRequest, RpcResponse};
pub use registry::{ChainState, HandlerOutcome, Module, ModuleRegistry};
