//! Generic encode/decode entry points over schema-described messages.
//!
//! A message type plugs into the codec by naming its schema and mapping
//! itself to and from a row of field values. Both directions run through
//! the shared descriptor routine, which keeps `decode(encode(m)) == m`
//! and `encode(decode(b)) == b` a property of the schema layer rather
//! than of each message type.

use crate::core::schema::{decode_fields, encode_fields, FieldValue, MessageSchema};
use crate::error::Result;
use bytes::Bytes;
use tracing::debug;

/// A message with a fixed wire schema.
///
/// `from_fields` receives exactly the row shapes its schema declares;
/// a mismatch is reported as an error, never a panic.
pub trait WireMessage: Sized {
    /// The ordered field list defining this type's wire identity.
    const SCHEMA: &'static MessageSchema;

    fn to_fields(&self) -> Vec<FieldValue>;

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self>;
}

/// Encode a message into its exact wire bytes.
pub fn encode_message<M: WireMessage>(message: &M) -> Result<Bytes> {
    encode_fields(M::SCHEMA, &message.to_fields())
}

/// Decode a raw buffer the caller already knows the type of.
///
/// The format is not self-describing: the expected type arrives out of
/// band with the buffer.
pub fn decode_message<M: WireMessage>(bytes: &[u8]) -> Result<M> {
    let fields = decode_fields(M::SCHEMA, bytes).map_err(|e| {
        debug!(message = M::SCHEMA.name, len = bytes.len(), error = %e, "decode failed");
        e
    })?;
    M::from_fields(fields)
}
