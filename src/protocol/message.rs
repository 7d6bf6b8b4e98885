//! # Message Catalog
//!
//! The fixed set of peer synchronization messages and their wire
//! schemas.
//!
//! Every type here is pure data: constructed immutable with per-field
//! defaults, compared field-wise, encoded and decoded through the
//! generic schema codec. Field order is part of each type's wire
//! identity.
//!
//! ## Catalog
//! - **HandshakeRequest**: chain-head and finalized-checkpoint identity
//! - **Goodbye**: teardown with a reason code
//! - **BlocksByRangeRequest/Response**: slot-ranged block sync
//! - **BlocksByRootRequest/Response**: root-indexed block sync

use crate::core::codec::{decode_message, encode_message, WireMessage};
use crate::core::schema::{ElemKind, FieldDef, FieldKind, FieldValue, MessageSchema};
use crate::error::{ProtocolError, Result};
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;

/// Fork identifier carried in the handshake, fixed at four bytes.
pub type ForkVersion = [u8; 4];

/// A 32-byte block or state root.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Root(pub [u8; 32]);

impl Root {
    /// The all-zero root, used before any chain is finalized.
    pub const ZERO: Root = Root([0u8; 32]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Root {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|e| ProtocolError::InvalidParams(format!("invalid root hex: {e}")))?;
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| ProtocolError::InvalidParams("root must be 32 bytes".to_string()))?;
        Ok(Root(bytes))
    }
}

/// An opaque, already-serialized block supplied by the chain layer.
/// The codec only moves it; it never looks inside.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Block(Vec<u8>);

impl Block {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self(payload.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({} bytes)", self.0.len())
    }
}

/// Well-known `Goodbye` reason codes. Arbitrary `u64` values remain
/// valid on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum GoodbyeReason {
    ClientShutdown = 1,
    IrrelevantNetwork = 2,
    Fault = 3,
}

impl From<GoodbyeReason> for u64 {
    fn from(reason: GoodbyeReason) -> u64 {
        reason as u64
    }
}

/// Initial peer message exchanging chain-head and finalized-checkpoint
/// identity before synchronization begins. The default value describes
/// a node with no finalized chain yet: all-zero roots, epoch and slot
/// zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandshakeRequest {
    pub fork_version: ForkVersion,
    pub finalized_root: Root,
    pub finalized_epoch: u64,
    pub head_root: Root,
    pub head_slot: u64,
}

/// Teardown notice carrying a reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goodbye {
    pub reason: u64,
}

impl Goodbye {
    pub fn new(reason: impl Into<u64>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Request for `count` blocks starting at `start_slot`, every `step`
/// slots, on the chain identified by `head_block_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocksByRangeRequest {
    pub head_block_root: Root,
    pub start_slot: u64,
    pub count: u64,
    pub step: u64,
}

/// Blocks answering a [`BlocksByRangeRequest`]. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocksByRangeResponse {
    pub blocks: Vec<Block>,
}

/// Request for the blocks with the given roots. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocksByRootRequest {
    pub block_roots: Vec<Root>,
}

/// Blocks answering a [`BlocksByRootRequest`]. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocksByRootResponse {
    pub blocks: Vec<Block>,
}

static HANDSHAKE_SCHEMA: MessageSchema = MessageSchema {
    name: "HandshakeRequest",
    fields: &[
        FieldDef {
            name: "fork_version",
            kind: FieldKind::Bytes4,
        },
        FieldDef {
            name: "finalized_root",
            kind: FieldKind::Bytes32,
        },
        FieldDef {
            name: "finalized_epoch",
            kind: FieldKind::U64,
        },
        FieldDef {
            name: "head_root",
            kind: FieldKind::Bytes32,
        },
        FieldDef {
            name: "head_slot",
            kind: FieldKind::U64,
        },
    ],
};

static GOODBYE_SCHEMA: MessageSchema = MessageSchema {
    name: "Goodbye",
    fields: &[FieldDef {
        name: "reason",
        kind: FieldKind::U64,
    }],
};

static BLOCKS_BY_RANGE_REQUEST_SCHEMA: MessageSchema = MessageSchema {
    name: "BlocksByRangeRequest",
    fields: &[
        FieldDef {
            name: "head_block_root",
            kind: FieldKind::Bytes32,
        },
        FieldDef {
            name: "start_slot",
            kind: FieldKind::U64,
        },
        FieldDef {
            name: "count",
            kind: FieldKind::U64,
        },
        FieldDef {
            name: "step",
            kind: FieldKind::U64,
        },
    ],
};

static BLOCKS_BY_RANGE_RESPONSE_SCHEMA: MessageSchema = MessageSchema {
    name: "BlocksByRangeResponse",
    fields: &[FieldDef {
        name: "blocks",
        kind: FieldKind::List {
            elem: ElemKind::Blob,
            min_len: 1,
        },
    }],
};

static BLOCKS_BY_ROOT_REQUEST_SCHEMA: MessageSchema = MessageSchema {
    name: "BlocksByRootRequest",
    fields: &[FieldDef {
        name: "block_roots",
        kind: FieldKind::List {
            elem: ElemKind::Bytes32,
            min_len: 1,
        },
    }],
};

static BLOCKS_BY_ROOT_RESPONSE_SCHEMA: MessageSchema = MessageSchema {
    name: "BlocksByRootResponse",
    fields: &[FieldDef {
        name: "blocks",
        kind: FieldKind::List {
            elem: ElemKind::Blob,
            min_len: 1,
        },
    }],
};

fn row_mismatch(schema: &MessageSchema) -> ProtocolError {
    ProtocolError::MalformedMessage(format!("decoded row does not match '{}'", schema.name))
}

impl WireMessage for HandshakeRequest {
    const SCHEMA: &'static MessageSchema = &HANDSHAKE_SCHEMA;

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Bytes4(self.fork_version),
            FieldValue::Bytes32(self.finalized_root.0),
            FieldValue::U64(self.finalized_epoch),
            FieldValue::Bytes32(self.head_root.0),
            FieldValue::U64(self.head_slot),
        ]
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self> {
        match <[FieldValue; 5]>::try_from(fields) {
            Ok(
                [FieldValue::Bytes4(fork_version), FieldValue::Bytes32(finalized_root), FieldValue::U64(finalized_epoch), FieldValue::Bytes32(head_root), FieldValue::U64(head_slot)],
            ) => Ok(Self {
                fork_version,
                finalized_root: Root(finalized_root),
                finalized_epoch,
                head_root: Root(head_root),
                head_slot,
            }),
            _ => Err(row_mismatch(Self::SCHEMA)),
        }
    }
}

impl WireMessage for Goodbye {
    const SCHEMA: &'static MessageSchema = &GOODBYE_SCHEMA;

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![FieldValue::U64(self.reason)]
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self> {
        match <[FieldValue; 1]>::try_from(fields) {
            Ok([FieldValue::U64(reason)]) => Ok(Self { reason }),
            _ => Err(row_mismatch(Self::SCHEMA)),
        }
    }
}

impl WireMessage for BlocksByRangeRequest {
    const SCHEMA: &'static MessageSchema = &BLOCKS_BY_RANGE_REQUEST_SCHEMA;

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Bytes32(self.head_block_root.0),
            FieldValue::U64(self.start_slot),
            FieldValue::U64(self.count),
            FieldValue::U64(self.step),
        ]
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self> {
        match <[FieldValue; 4]>::try_from(fields) {
            Ok(
                [FieldValue::Bytes32(head_block_root), FieldValue::U64(start_slot), FieldValue::U64(count), FieldValue::U64(step)],
            ) => Ok(Self {
                head_block_root: Root(head_block_root),
                start_slot,
                count,
                step,
            }),
            _ => Err(row_mismatch(Self::SCHEMA)),
        }
    }
}

fn blocks_to_fields(blocks: &[Block]) -> Vec<FieldValue> {
    vec![FieldValue::BlobList(
        blocks.iter().map(|b| b.as_bytes().to_vec()).collect(),
    )]
}

fn blocks_from_fields(fields: Vec<FieldValue>, schema: &MessageSchema) -> Result<Vec<Block>> {
    match <[FieldValue; 1]>::try_from(fields) {
        Ok([FieldValue::BlobList(blobs)]) => Ok(blobs.into_iter().map(Block::new).collect()),
        _ => Err(row_mismatch(schema)),
    }
}

impl WireMessage for BlocksByRangeResponse {
    const SCHEMA: &'static MessageSchema = &BLOCKS_BY_RANGE_RESPONSE_SCHEMA;

    fn to_fields(&self) -> Vec<FieldValue> {
        blocks_to_fields(&self.blocks)
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self> {
        Ok(Self {
            blocks: blocks_from_fields(fields, Self::SCHEMA)?,
        })
    }
}

impl WireMessage for BlocksByRootRequest {
    const SCHEMA: &'static MessageSchema = &BLOCKS_BY_ROOT_REQUEST_SCHEMA;

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![FieldValue::Bytes32List(
            self.block_roots.iter().map(|r| r.0).collect(),
        )]
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self> {
        match <[FieldValue; 1]>::try_from(fields) {
            Ok([FieldValue::Bytes32List(roots)]) => Ok(Self {
                block_roots: roots.into_iter().map(Root).collect(),
            }),
            _ => Err(row_mismatch(Self::SCHEMA)),
        }
    }
}

impl WireMessage for BlocksByRootResponse {
    const SCHEMA: &'static MessageSchema = &BLOCKS_BY_ROOT_RESPONSE_SCHEMA;

    fn to_fields(&self) -> Vec<FieldValue> {
        blocks_to_fields(&self.blocks)
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self> {
        Ok(Self {
            blocks: blocks_from_fields(fields, Self::SCHEMA)?,
        })
    }
}

/// Out-of-band type tag a caller attaches to a raw buffer before
/// decoding. The wire format itself is not self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Handshake,
    Goodbye,
    BlocksByRangeRequest,
    BlocksByRangeResponse,
    BlocksByRootRequest,
    BlocksByRootResponse,
}

impl MessageKind {
    pub fn schema(self) -> &'static MessageSchema {
        match self {
            MessageKind::Handshake => &HANDSHAKE_SCHEMA,
            MessageKind::Goodbye => &GOODBYE_SCHEMA,
            MessageKind::BlocksByRangeRequest => &BLOCKS_BY_RANGE_REQUEST_SCHEMA,
            MessageKind::BlocksByRangeResponse => &BLOCKS_BY_RANGE_RESPONSE_SCHEMA,
            MessageKind::BlocksByRootRequest => &BLOCKS_BY_ROOT_REQUEST_SCHEMA,
            MessageKind::BlocksByRootResponse => &BLOCKS_BY_ROOT_RESPONSE_SCHEMA,
        }
    }
}

/// A typed synchronization message of any catalog kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    Handshake(HandshakeRequest),
    Goodbye(Goodbye),
    BlocksByRangeRequest(BlocksByRangeRequest),
    BlocksByRangeResponse(BlocksByRangeResponse),
    BlocksByRootRequest(BlocksByRootRequest),
    BlocksByRootResponse(BlocksByRootResponse),
}

impl SyncMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            SyncMessage::Handshake(_) => MessageKind::Handshake,
            SyncMessage::Goodbye(_) => MessageKind::Goodbye,
            SyncMessage::BlocksByRangeRequest(_) => MessageKind::BlocksByRangeRequest,
            SyncMessage::BlocksByRangeResponse(_) => MessageKind::BlocksByRangeResponse,
            SyncMessage::BlocksByRootRequest(_) => MessageKind::BlocksByRootRequest,
            SyncMessage::BlocksByRootResponse(_) => MessageKind::BlocksByRootResponse,
        }
    }

    /// Encode into exact wire bytes.
    pub fn encode(&self) -> Result<Bytes> {
        match self {
            SyncMessage::Handshake(m) => encode_message(m),
            SyncMessage::Goodbye(m) => encode_message(m),
            SyncMessage::BlocksByRangeRequest(m) => encode_message(m),
            SyncMessage::BlocksByRangeResponse(m) => encode_message(m),
            SyncMessage::BlocksByRootRequest(m) => encode_message(m),
            SyncMessage::BlocksByRootResponse(m) => encode_message(m),
        }
    }

    /// Decode a raw buffer tagged with its expected kind.
    pub fn decode(kind: MessageKind, bytes: &[u8]) -> Result<Self> {
        Ok(match kind {
            MessageKind::Handshake => SyncMessage::Handshake(decode_message(bytes)?),
            MessageKind::Goodbye => SyncMessage::Goodbye(decode_message(bytes)?),
            MessageKind::BlocksByRangeRequest => {
                SyncMessage::BlocksByRangeRequest(decode_message(bytes)?)
            }
            MessageKind::BlocksByRangeResponse => {
                SyncMessage::BlocksByRangeResponse(decode_message(bytes)?)
            }
            MessageKind::BlocksByRootRequest => {
                SyncMessage::BlocksByRootRequest(decode_message(bytes)?)
            }
            MessageKind::BlocksByRootResponse => {
                SyncMessage::BlocksByRootResponse(decode_message(bytes)?)
            }
        })
    }
}
