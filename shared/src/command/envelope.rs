use tandem_serde::{ByteReader, ByteWriter, CodecError, Serde};

use crate::constants::MAX_ARGS_LEN;
use crate::types::{OpId, PeerId, Tick};

/// A scheduled, serialized state-mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEnvelope {
    /// The peer whose action produced this command.
    pub origin: PeerId,
    pub op: OpId,
    pub args: Vec<u8>,
    /// Assigned exactly once by the ordering authority; identical on every
    /// peer receiving the envelope.
    pub scheduled_tick: Tick,
    /// Whether this peer's own action produced the envelope. In-memory only,
    /// never serialized: each receiver derives it against its own identity.
    pub locally_issued: bool,
}

impl Serde for CommandEnvelope {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.origin);
        writer.write_u16(self.op);
        writer.write_bytes(&self.args);
        writer.write_u32(self.scheduled_tick);
        // locally_issued deliberately not written
    }

    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        Ok(Self {
            origin: reader.read_u32()?,
            op: reader.read_u16()?,
            args: reader.read_bytes(MAX_ARGS_LEN)?,
            scheduled_tick: reader.read_u32()?,
            locally_issued: false,
        })
    }
}

// Tests
