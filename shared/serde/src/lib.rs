//! # Tandem Serde
//! Byte-level wire codec shared by the tandem replication crates.
//!
//! All multi-byte integers are written fixed-width, big-endian, regardless of
//! host architecture. There are no variable-length encodings on the wire.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod compress;
mod error;
mod reader;
mod writer;

pub use compress::{compress, decompress};
pub use error::CodecError;
pub use reader::ByteReader;
pub use writer::ByteWriter;

/// Default cap for length-prefixed strings that carry identifiers and names.
pub const MAX_STRING_LEN: usize = 32_768;

/// A value that can be written to and read back from the wire.
///
/// Composite types whose fields need caller-specified caps implement their
/// own inherent `encode`/`decode` methods instead.
pub trait Serde: Sized {
    fn ser(&self, writer: &mut ByteWriter);
    fn de(reader: &mut ByteReader) -> Result<Self, CodecError>;
}

impl Serde for u8 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u8(*self);
    }
    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        reader.read_u8()
    }
}

impl Serde for u16 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u16(*self);
    }
    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        reader.read_u16()
    }
}

impl Serde for u32 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u32(*self);
    }
    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        reader.read_u32()
    }
}

impl Serde for u64 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u64(*self);
    }
    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        reader.read_u64()
    }
}

impl Serde for i32 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_i32(*self);
    }
    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        reader.read_i32()
    }
}

impl Serde for i64 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_i64(*self);
    }
    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        reader.read_i64()
    }
}

impl Serde for bool {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_bool(*self);
    }
    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        reader.read_bool()
    }
}

// Tests
