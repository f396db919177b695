use crate::error::CodecError;

// zstd level 3 is the library default; good ratio for XML-heavy payloads
// without noticeable stalls at join time.
const COMPRESSION_LEVEL: i32 = 3;

/// Compresses a whole message buffer.
///
/// Compression is a separate wrap step applied after encoding; the codec
/// itself never compresses individual fields. Frames are written with a
/// content checksum: flipped payload bytes must fail decompression, not
/// decode into wrong bytes.
pub fn compress(payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut compressor = zstd::bulk::Compressor::new(COMPRESSION_LEVEL)
        .map_err(|_| CodecError::FormatError("compression failed"))?;
    compressor
        .include_checksum(true)
        .map_err(|_| CodecError::FormatError("compression failed"))?;
    compressor
        .compress(payload)
        .map_err(|_| CodecError::FormatError("compression failed"))
}

/// Decompresses a whole message buffer, verifying the frame checksum.
///
/// `max_decompressed` bounds the memory a malicious or buggy peer can make
/// us allocate: the decompressed size is checked against it before the
/// payload is fully expanded. A corrupt stream fails with `FormatError`,
/// never a partial result.
pub fn decompress(payload: &[u8], max_decompressed: usize) -> Result<Vec<u8>, CodecError> {
    zstd::bulk::decompress(payload, max_decompressed)
        .map_err(|_| CodecError::FormatError("corrupt or oversized compressed stream"))
}

// Tests
