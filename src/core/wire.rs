//! Low-level wire primitives shared by every message layout.
//!
//! All multi-byte integers are little-endian. Fixed-width values are
//! written back to back with no delimiters; variable-length byte blobs
//! carry a u32 length prefix. The reader is purely computational and
//! holds no shared state, so it is safe for unsynchronized concurrent
//! use on independent buffers.

use crate::config::MAX_BLOCK_BYTES;
use crate::error::{constants, ProtocolError, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// Sequential bounds-checked reader over a raw message buffer.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(ProtocolError::MalformedMessage(format!(
                "truncated '{what}': need {len} bytes, {} remaining",
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_bytes4(&mut self, what: &str) -> Result<[u8; 4]> {
        let mut out = [0u8; 4];
        out.copy_from_slice(self.take(4, what)?);
        Ok(out)
    }

    pub fn read_bytes32(&mut self, what: &str) -> Result<[u8; 32]> {
        let mut out = [0u8; 32];
        out.copy_from_slice(self.take(32, what)?);
        Ok(out)
    }

    pub fn read_u32(&mut self, what: &str) -> Result<u32> {
        let mut out = [0u8; 4];
        out.copy_from_slice(self.take(4, what)?);
        Ok(u32::from_le_bytes(out))
    }

    pub fn read_u64(&mut self, what: &str) -> Result<u64> {
        let mut out = [0u8; 8];
        out.copy_from_slice(self.take(8, what)?);
        Ok(u64::from_le_bytes(out))
    }

    /// Read a u32 length prefix followed by that many bytes.
    pub fn read_blob(&mut self, what: &str) -> Result<&'a [u8]> {
        let len = self.read_u32(what)? as usize;
        if len > MAX_BLOCK_BYTES {
            return Err(ProtocolError::MalformedMessage(format!(
                "'{what}' blob of {len} bytes exceeds the {MAX_BLOCK_BYTES}-byte limit"
            )));
        }
        self.take(len, what)
    }

    /// Reject any bytes left after the caller decoded every field.
    /// Unknown trailing bytes would let wire-format drift go undetected.
    pub fn finish(&self, what: &str) -> Result<()> {
        if self.remaining() != 0 {
            return Err(ProtocolError::MalformedMessage(format!(
                "{} in '{what}': {} byte(s) left",
                constants::ERR_TRAILING_BYTES,
                self.remaining()
            )));
        }
        Ok(())
    }
}

/// Append-only writer mirroring [`WireReader`].
pub struct WireWriter {
    buf: BytesMut,
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl WireWriter {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn put_bytes4(&mut self, value: [u8; 4]) {
        self.buf.put_slice(&value);
    }

    pub fn put_bytes32(&mut self, value: [u8; 32]) {
        self.buf.put_slice(&value);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.put_slice(&value.to_le_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.put_slice(&value.to_le_bytes());
    }

    pub fn put_blob(&mut self, value: &[u8]) -> Result<()> {
        if value.len() > MAX_BLOCK_BYTES {
            return Err(ProtocolError::MalformedMessage(format!(
                "refusing to encode a {}-byte blob over the {MAX_BLOCK_BYTES}-byte limit",
                value.len()
            )));
        }
        self.put_u32(value.len() as u32);
        self.buf.put_slice(value);
        Ok(())
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reads_fixed_fields_at_sequential_offsets() {
        let mut w = WireWriter::new();
        w.put_bytes4([1, 2, 3, 4]);
        w.put_u64(0xDEAD_BEEF);
        let bytes = w.into_bytes();

        let mut r = WireReader::new(&bytes);
        assert_eq!(r.read_bytes4("tag").unwrap(), [1, 2, 3, 4]);
        assert_eq!(r.read_u64("value").unwrap(), 0xDEAD_BEEF);
        assert!(r.finish("test").is_ok());
    }

    #[test]
    fn truncated_read_is_rejected() {
        let mut r = WireReader::new(&[0u8; 3]);
        let err = r.read_bytes4("tag").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedMessage(_)));
        assert!(err.to_string().contains("tag"));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut r = WireReader::new(&[0u8; 9]);
        r.read_u64("value").unwrap();
        assert!(r.finish("test").is_err());
    }

    #[test]
    fn blob_roundtrip_and_length_guard() {
        let mut w = WireWriter::new();
        w.put_blob(&[9, 9, 9]).unwrap();
        let bytes = w.into_bytes();

        let mut r = WireReader::new(&bytes);
        assert_eq!(r.read_blob("payload").unwrap(), &[9, 9, 9]);
        assert!(r.finish("test").is_ok());

        // A length prefix that overruns the buffer must fail.
        let mut bad = bytes.to_vec();
        bad[0] = 200;
        let mut r = WireReader::new(&bad);
        assert!(r.read_blob("payload").is_err());
    }

    #[test]
    fn integers_are_little_endian() {
        let mut w = WireWriter::new();
        w.put_u32(1);
        let bytes = w.into_bytes();
        assert_eq!(&bytes[..], &[1, 0, 0, 0]);
    }
}
