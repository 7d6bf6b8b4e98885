//! # Message Schemas
//!
//! Ordered field descriptors and the single generic encode/decode
//! routine they drive.
//!
//! Every wire message is described by a [`MessageSchema`]: an ordered
//! list of named fields, each either fixed-width or a variable-length
//! list. One pair of generic routines consumes the descriptor for both
//! directions, so no message type duplicates layout logic and field
//! order stays part of the wire identity in exactly one place.
//!
//! The schema layer is catalog-agnostic: list elements are either
//! 32-byte roots or opaque byte blobs. Typed messages map themselves to
//! and from [`FieldValue`] rows.

use crate::config::MAX_REQUEST_BLOCKS;
use crate::core::wire::{WireReader, WireWriter};
use crate::error::{constants, ProtocolError, Result};
use bytes::Bytes;

/// Element type of a variable-length list field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemKind {
    /// Fixed 32-byte value (block roots)
    Bytes32,
    /// Opaque length-prefixed byte blob (serialized blocks)
    Blob,
}

/// Wire shape of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Fixed 4-byte value (fork version tags)
    Bytes4,
    /// Fixed 32-byte value (roots)
    Bytes32,
    /// Fixed-width unsigned 64-bit integer, little-endian
    U64,
    /// Count-prefixed list of `elem` values, at least `min_len` long
    List { elem: ElemKind, min_len: usize },
}

impl FieldKind {
    /// Encoded byte width, when it is independent of the value.
    fn fixed_width(self) -> Option<usize> {
        match self {
            FieldKind::Bytes4 => Some(4),
            FieldKind::Bytes32 => Some(32),
            FieldKind::U64 => Some(8),
            FieldKind::List { .. } => None,
        }
    }
}

/// A named field at a fixed position in its message's field list.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Ordered field list defining one message type's wire identity.
/// Reordering fields changes the format.
#[derive(Debug, Clone, Copy)]
pub struct MessageSchema {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

impl MessageSchema {
    /// Total encoded size when every field is fixed-width.
    /// Lets the decoder reject wrong-width buffers before reading a
    /// single field, so a 31-byte root can never shift later fields.
    pub fn fixed_size(&self) -> Option<usize> {
        self.fields
            .iter()
            .map(|f| f.kind.fixed_width())
            .sum::<Option<usize>>()
    }
}

/// A decoded field, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bytes4([u8; 4]),
    Bytes32([u8; 32]),
    U64(u64),
    Bytes32List(Vec<[u8; 32]>),
    BlobList(Vec<Vec<u8>>),
}

fn schema_mismatch(schema: &MessageSchema, field: &FieldDef) -> ProtocolError {
    ProtocolError::MalformedMessage(format!(
        "field '{}' of '{}' does not match its declared kind",
        field.name, schema.name
    ))
}

fn check_list_len(schema: &MessageSchema, field: &FieldDef, len: usize) -> Result<()> {
    let FieldKind::List { min_len, .. } = field.kind else {
        return Err(schema_mismatch(schema, field));
    };
    if len < min_len {
        return Err(ProtocolError::MalformedMessage(format!(
            "{}: '{}' of '{}' has {len}, minimum is {min_len}",
            constants::ERR_EMPTY_LIST,
            field.name,
            schema.name
        )));
    }
    if len > MAX_REQUEST_BLOCKS {
        return Err(ProtocolError::MalformedMessage(format!(
            "'{}' of '{}' has {len} elements, limit is {MAX_REQUEST_BLOCKS}",
            field.name, schema.name
        )));
    }
    Ok(())
}

/// Encode a row of field values against its schema.
///
/// The values must line up with the schema's field list; list minimums
/// are enforced here as well so an encoder can never produce a buffer a
/// compliant decoder would reject.
pub fn encode_fields(schema: &MessageSchema, values: &[FieldValue]) -> Result<Bytes> {
    if values.len() != schema.fields.len() {
        return Err(ProtocolError::MalformedMessage(format!(
            "'{}' expects {} fields, got {}",
            schema.name,
            schema.fields.len(),
            values.len()
        )));
    }

    let mut writer = WireWriter::with_capacity(schema.fixed_size().unwrap_or(64));
    for (field, value) in schema.fields.iter().zip(values) {
        match (field.kind, value) {
            (FieldKind::Bytes4, FieldValue::Bytes4(v)) => writer.put_bytes4(*v),
            (FieldKind::Bytes32, FieldValue::Bytes32(v)) => writer.put_bytes32(*v),
            (FieldKind::U64, FieldValue::U64(v)) => writer.put_u64(*v),
            (
                FieldKind::List {
                    elem: ElemKind::Bytes32,
                    ..
                },
                FieldValue::Bytes32List(items),
            ) => {
                check_list_len(schema, field, items.len())?;
                writer.put_u32(items.len() as u32);
                for item in items {
                    writer.put_bytes32(*item);
                }
            }
            (
                FieldKind::List {
                    elem: ElemKind::Blob,
                    ..
                },
                FieldValue::BlobList(items),
            ) => {
                check_list_len(schema, field, items.len())?;
                writer.put_u32(items.len() as u32);
                for item in items {
                    writer.put_blob(item)?;
                }
            }
            _ => return Err(schema_mismatch(schema, field)),
        }
    }
    Ok(writer.into_bytes())
}

/// Decode a raw buffer into a row of field values against its schema.
///
/// Fails with `MalformedMessage` on truncated buffers, list counts that
/// disagree with the remaining bytes, under-minimum lists, and trailing
/// bytes after the final field. Never returns a partial row.
pub fn decode_fields(schema: &MessageSchema, bytes: &[u8]) -> Result<Vec<FieldValue>> {
    if let Some(want) = schema.fixed_size() {
        if bytes.len() != want {
            return Err(ProtocolError::MalformedMessage(format!(
                "'{}' is {want} bytes on the wire, got {}",
                schema.name,
                bytes.len()
            )));
        }
    }

    let mut reader = WireReader::new(bytes);
    let mut out = Vec::with_capacity(schema.fields.len());
    for field in schema.fields {
        let value = match field.kind {
            FieldKind::Bytes4 => FieldValue::Bytes4(reader.read_bytes4(field.name)?),
            FieldKind::Bytes32 => FieldValue::Bytes32(reader.read_bytes32(field.name)?),
            FieldKind::U64 => FieldValue::U64(reader.read_u64(field.name)?),
            FieldKind::List { elem, .. } => {
                let count = reader.read_u32(field.name)? as usize;
                check_list_len(schema, field, count)?;
                match elem {
                    ElemKind::Bytes32 => {
                        let mut items = Vec::with_capacity(count.min(reader.remaining() / 32 + 1));
                        for _ in 0..count {
                            items.push(reader.read_bytes32(field.name)?);
                        }
                        FieldValue::Bytes32List(items)
                    }
                    ElemKind::Blob => {
                        let mut items = Vec::with_capacity(count.min(reader.remaining() / 4 + 1));
                        for _ in 0..count {
                            items.push(reader.read_blob(field.name)?.to_vec());
                        }
                        FieldValue::BlobList(items)
                    }
                }
            }
        };
        out.push(value);
    }
    reader.finish(schema.name)?;
    Ok(out)
}
