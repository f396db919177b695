use crate::error::CodecError;

/// Reads wire bytes produced by a `ByteWriter`.
///
/// Every length-prefixed read takes a caller-specified cap. A declared
/// length exceeding the cap fails with `OversizedField` before any bytes of
/// the field are consumed; no partial value is ever produced.
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .cursor
            .checked_add(count)
            .ok_or(CodecError::FormatError("field length overflows buffer"))?;
        if end > self.buffer.len() {
            return Err(CodecError::FormatError("buffer underrun"));
        }
        let slice = &self.buffer[self.cursor..end];
        self.cursor = end;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let bytes = self.take(8)?;
        let mut out = [0u8; 8];
        out.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(out))
    }

    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        let bytes = self.take(8)?;
        let mut out = [0u8; 8];
        out.copy_from_slice(bytes);
        Ok(i64::from_be_bytes(out))
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(CodecError::FormatError("invalid bool byte")),
        }
    }

    /// Reads a `u32` length prefix followed by that many raw bytes.
    pub fn read_bytes(&mut self, cap: usize) -> Result<Vec<u8>, CodecError> {
        let declared = self.read_u32()? as usize;
        if declared > cap {
            return Err(CodecError::OversizedField { declared, cap });
        }
        Ok(self.take(declared)?.to_vec())
    }

    /// Reads a length-prefixed UTF-8 string of at most `cap` bytes.
    pub fn read_string(&mut self, cap: usize) -> Result<String, CodecError> {
        let bytes = self.read_bytes(cap)?;
        String::from_utf8(bytes).map_err(|_| CodecError::FormatError("invalid utf-8 in string"))
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

// Tests
