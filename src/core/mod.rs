//! # Core Wire Components
//!
//! Low-level wire primitives, message schemas, and the generic codec.
//!
//! This module provides the data-plane foundation: deterministic
//! fixed/variable-length field layout and byte-exact encode/decode.
//!
//! ## Components
//! - **Wire**: Bounds-checked little-endian reader/writer primitives
//! - **Schema**: Ordered field descriptors driving one generic routine
//! - **Codec**: Typed encode/decode entry points over schemas
//!
//! ## Security
//! - List counts are capped before any element allocation
//! - Wrong-width buffers are rejected before field extraction
//! - Trailing bytes after a complete message are an error

pub mod codec;
pub mod schema;
pub mod wire;
