//! # Built-in Handler Modules
//!
//! The standard handler groups registered with the dispatcher: a
//! chain-query module (`eth`) and a debugging module (`debug`).
//!
//! Handlers receive the request's chain snapshot and its positional
//! params, and return either a JSON value or, for the designated
//! administrative method only, a replacement chain state.
//!
//! Also provides [`MemoryChain`], a reference in-memory implementation
//! of the chain collaborator used by tests, benches, and embedders
//! without a full chain.

use crate::config::RpcConfig;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::message::{Block, ForkVersion, Root};
use crate::rpc::registry::{ChainState, HandlerOutcome, Module, ModuleRegistry};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Builds a replacement chain state from an RPC-supplied description.
/// Injected by the embedder; the dispatcher never constructs chain
/// states itself.
pub type ChainFactory = Arc<dyn Fn(&Value) -> Result<Arc<dyn ChainState>> + Send + Sync>;

fn param<'a>(params: &'a [Value], index: usize) -> Result<&'a Value> {
    params.get(index).ok_or_else(|| {
        ProtocolError::InvalidParams(format!(
            "{} at position {index}",
            constants::ERR_MISSING_PARAM
        ))
    })
}

fn root_param(params: &[Value], index: usize) -> Result<Root> {
    let value = param(params, index)?;
    let text = value.as_str().ok_or_else(|| {
        ProtocolError::InvalidParams(format!(
            "{}: position {index} must be a hex root string",
            constants::ERR_PARAM_TYPE
        ))
    })?;
    text.parse()
}

fn u64_param(params: &[Value], index: usize) -> Result<u64> {
    param(params, index)?.as_u64().ok_or_else(|| {
        ProtocolError::InvalidParams(format!(
            "{}: position {index} must be an unsigned integer",
            constants::ERR_PARAM_TYPE
        ))
    })
}

fn block_to_value(block: Option<Block>) -> Value {
    match block {
        Some(block) => Value::String(format!("0x{}", hex::encode(block.as_bytes()))),
        None => Value::Null,
    }
}

/// The public chain-query module.
pub fn eth_module() -> Module {
    Module::new("eth")
        .operation("blockNumber", |chain, _params| {
            Ok(HandlerOutcome::Value(Value::from(chain.head_slot())))
        })
        .operation("syncing", |chain, _params| {
            Ok(HandlerOutcome::Value(Value::Bool(chain.is_syncing())))
        })
        .operation("getBlockByHash", |chain, params| {
            let root = root_param(params, 0)?;
            Ok(HandlerOutcome::Value(block_to_value(
                chain.block_by_root(&root),
            )))
        })
        .operation("getBlockByNumber", |chain, params| {
            let slot = u64_param(params, 0)?;
            let block = chain.blocks_by_range(slot, 1, 1).into_iter().next();
            Ok(HandlerOutcome::Value(block_to_value(block)))
        })
}

/// The debugging module. `resetChainTo` is the single administrative
/// method allowed to replace the shared chain state.
pub fn debug_module(factory: ChainFactory) -> Module {
    Module::new("debug")
        .operation("getChainHead", |chain, _params| {
            Ok(HandlerOutcome::Value(json!({
                "head_slot": chain.head_slot(),
                "head_root": chain.head_root().to_string(),
                "finalized_epoch": chain.finalized_epoch(),
                "finalized_root": chain.finalized_root().to_string(),
                "syncing": chain.is_syncing(),
            })))
        })
        .operation("resetChainTo", move |_chain, params| {
            let description = param(params, 0)?;
            let new_state = factory(description)?;
            Ok(HandlerOutcome::ReplaceChain(new_state))
        })
}

/// Build a registry with the standard modules. The debug module is
/// registered only when the configuration exposes it.
pub fn standard_registry(
    chain: Arc<dyn ChainState>,
    factory: ChainFactory,
    config: &RpcConfig,
) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new(chain);
    registry.register(eth_module());
    if config.expose_debug_module {
        registry.register(debug_module(factory));
    }
    registry
}

/// Reference in-memory chain state.
#[derive(Debug, Clone, Default)]
pub struct MemoryChain {
    head_slot: u64,
    head_root: Root,
    finalized_epoch: u64,
    finalized_root: Root,
    fork_version: ForkVersion,
    syncing: bool,
    blocks: HashMap<Root, Block>,
    slots: BTreeMap<u64, Root>,
}

impl MemoryChain {
    pub fn new(head_slot: u64, head_root: Root) -> Self {
        Self {
            head_slot,
            head_root,
            ..Self::default()
        }
    }

    pub fn with_finalized(mut self, epoch: u64, root: Root) -> Self {
        self.finalized_epoch = epoch;
        self.finalized_root = root;
        self
    }

    pub fn with_fork_version(mut self, fork_version: ForkVersion) -> Self {
        self.fork_version = fork_version;
        self
    }

    pub fn with_syncing(mut self, syncing: bool) -> Self {
        self.syncing = syncing;
        self
    }

    pub fn with_block(mut self, slot: u64, root: Root, block: Block) -> Self {
        self.blocks.insert(root, block);
        self.slots.insert(slot, root);
        self
    }
}

impl ChainState for MemoryChain {
    fn head_slot(&self) -> u64 {
        self.head_slot
    }

    fn head_root(&self) -> Root {
        self.head_root
    }

    fn finalized_epoch(&self) -> u64 {
        self.finalized_epoch
    }

    fn finalized_root(&self) -> Root {
        self.finalized_root
    }

    fn fork_version(&self) -> ForkVersion {
        self.fork_version
    }

    fn is_syncing(&self) -> bool {
        self.syncing
    }

    fn block_by_root(&self, root: &Root) -> Option<Block> {
        self.blocks.get(root).cloned()
    }

    fn blocks_by_range(&self, start_slot: u64, count: u64, step: u64) -> Vec<Block> {
        if count == 0 || step == 0 {
            return vec![];
        }
        let mut out = Vec::new();
        let mut slot = start_slot;
        for _ in 0..count {
            if let Some(root) = self.slots.get(&slot) {
                if let Some(block) = self.blocks.get(root) {
                    out.push(block.clone());
                }
            }
            slot = match slot.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
        out
    }
}

/// JSON description accepted by [`memory_chain_factory`].
#[derive(Debug, Deserialize)]
struct ChainDescription {
    #[serde(default)]
    head_slot: u64,
    #[serde(default)]
    head_root: Option<String>,
    #[serde(default)]
    finalized_epoch: u64,
    #[serde(default)]
    finalized_root: Option<String>,
    #[serde(default)]
    syncing: bool,
}

/// A [`ChainFactory`] building [`MemoryChain`] states from a JSON
/// description such as `{"head_slot": 64, "head_root": "0x.."}`.
pub fn memory_chain_factory() -> ChainFactory {
    Arc::new(|description: &Value| {
        let desc: ChainDescription = serde_json::from_value(description.clone())
            .map_err(|e| ProtocolError::InvalidParams(format!("invalid chain description: {e}")))?;

        let head_root = match desc.head_root {
            Some(text) => text.parse()?,
            None => Root::ZERO,
        };
        let finalized_root = match desc.finalized_root {
            Some(text) => text.parse()?,
            None => Root::ZERO,
        };

        let chain = MemoryChain::new(desc.head_slot, head_root)
            .with_finalized(desc.finalized_epoch, finalized_root)
            .with_syncing(desc.syncing);
        Ok(Arc::new(chain) as Arc<dyn ChainState>)
    })
}
