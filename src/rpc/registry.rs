//! Module registry and the shared chain-state handle.
//!
//! Handlers are plain functions held in an explicit per-module map
//! built at construction time. Only registered `(module, operation)`
//! pairs are reachable through dispatch; there is no runtime
//! introspection to fall through to.
//!
//! The chain state is a single handle shared by every module. A request
//! snapshots it once and works against that snapshot for its whole
//! lifetime, so a concurrent reset is observed either entirely or not
//! at all, never as a torn binding set.

use crate::error::{constants, ProtocolError, Result};
use crate::protocol::message::{Block, ForkVersion, HandshakeRequest, Root};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The chain/state collaborator behind the RPC modules. Opaque to
/// dispatch: replaceable as a unit via [`ModuleRegistry::replace_shared_state`].
pub trait ChainState: Send + Sync {
    fn head_slot(&self) -> u64;

    fn head_root(&self) -> Root;

    fn finalized_epoch(&self) -> u64;

    fn finalized_root(&self) -> Root;

    fn fork_version(&self) -> ForkVersion;

    fn is_syncing(&self) -> bool;

    fn block_by_root(&self, root: &Root) -> Option<Block>;

    /// Blocks at `start_slot`, `start_slot + step`, ... up to `count`
    /// results. Missing slots are skipped.
    fn blocks_by_range(&self, start_slot: u64, count: u64, step: u64) -> Vec<Block>;
}

/// Assemble the local half of the peer handshake from the current
/// chain snapshot.
pub fn local_handshake(chain: &dyn ChainState) -> HandshakeRequest {
    HandshakeRequest {
        fork_version: chain.fork_version(),
        finalized_root: chain.finalized_root(),
        finalized_epoch: chain.finalized_epoch(),
        head_root: chain.head_root(),
        head_slot: chain.head_slot(),
    }
}

/// What a handler produced: a plain result value, or a replacement
/// chain state. Only the designated administrative method may return
/// the latter; dispatch rejects it anywhere else.
pub enum HandlerOutcome {
    Value(Value),
    ReplaceChain(Arc<dyn ChainState>),
}

type HandlerFn = dyn Fn(&Arc<dyn ChainState>, &[Value]) -> Result<HandlerOutcome> + Send + Sync;

/// Shared chain-state binding, swapped atomically across all modules.
#[derive(Clone)]
pub struct ChainHandle {
    inner: Arc<RwLock<Arc<dyn ChainState>>>,
}

impl ChainHandle {
    pub fn new(state: Arc<dyn ChainState>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// One consistent snapshot for the lifetime of a request.
    pub fn snapshot(&self) -> Result<Arc<dyn ChainState>> {
        self.inner
            .read()
            .map(|guard| Arc::clone(&guard))
            .map_err(|_| ProtocolError::Custom(constants::ERR_REGISTRY_READ_LOCK.to_string()))
    }

    /// Swap the binding. The swap is a single pointer store under the
    /// write lock: concurrent readers see the old state or the new one,
    /// never a partial update. On failure the last-good binding stays
    /// in place and the error is surfaced.
    pub fn replace(&self, new_state: Arc<dyn ChainState>) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_REGISTRY_WRITE_LOCK.to_string()))?;
        *guard = new_state;
        Ok(())
    }
}

/// A named group of handler operations exposed to the dispatcher.
/// Registration is the whitelist: anything not added here does not
/// exist as far as dispatch is concerned.
pub struct Module {
    name: Cow<'static, str>,
    handlers: HashMap<Cow<'static, str>, Box<HandlerFn>>,
}

impl Module {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
        }
    }

    /// Register a public operation. Operation names must not contain
    /// the method separator: a name with one could never be resolved,
    /// because method parsing only ever yields two separator-free
    /// tokens.
    pub fn operation<F>(mut self, name: &'static str, handler: F) -> Self
    where
        F: Fn(&Arc<dyn ChainState>, &[Value]) -> Result<HandlerOutcome> + Send + Sync + 'static,
    {
        debug_assert!(
            !name.contains(crate::config::METHOD_SEPARATOR),
            "operation names must be separator-free"
        );
        self.handlers.insert(Cow::Borrowed(name), Box::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn resolve(&self, operation: &str) -> Option<&HandlerFn> {
        self.handlers.get(operation).map(|h| h.as_ref())
    }
}

/// Holds the named modules and the chain handle they all share.
pub struct ModuleRegistry {
    chain: ChainHandle,
    modules: HashMap<Cow<'static, str>, Module>,
}

impl ModuleRegistry {
    pub fn new(chain: Arc<dyn ChainState>) -> Self {
        Self {
            chain: ChainHandle::new(chain),
            modules: HashMap::new(),
        }
    }

    pub fn register(&mut self, module: Module) {
        self.modules.insert(module.name.clone(), module);
    }

    pub fn resolve(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Snapshot the shared chain state for one request.
    pub fn chain(&self) -> Result<Arc<dyn ChainState>> {
        self.chain.snapshot()
    }

    /// Replace the chain state observed by every module, atomically
    /// from the caller's point of view.
    pub fn replace_shared_state(&self, new_state: Arc<dyn ChainState>) -> Result<()> {
        self.chain.replace(new_state)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(|k| k.as_ref())
    }
}
