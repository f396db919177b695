// The different types of packets that cross between a peer and the
// authority. Real socket transport is an embedding concern; these are the
// payloads it carries.

use tandem_serde::{ByteReader, ByteWriter, CodecError, Serde, MAX_STRING_LEN};

use crate::command::envelope::CommandEnvelope;
use crate::constants::{MAX_ARGS_LEN, MAX_FINGERPRINT_LEN};
use crate::disconnect::DisconnectReason;
use crate::handshake::HandshakeResult;
use crate::types::{OpId, PeerId, Tick};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Compressed fingerprint blob plus the joiner's versions and requested
    /// username.
    JoinRequest {
        username: String,
        engine_version: String,
        session_version: String,
        fingerprint: Vec<u8>,
    },
    /// Version strings, the handshake verdict, and (if accepted) the
    /// assigned peer id, the tick the joining peer starts buffering from,
    /// and the authority's scheduling lookahead.
    JoinResponse {
        engine_version: String,
        session_version: String,
        result: HandshakeResult,
        peer_id: PeerId,
        baseline_tick: Tick,
        lookahead: Tick,
    },
    /// A peer's tick-less command, awaiting ordering by the authority.
    Request { op: OpId, args: Vec<u8> },
    /// An ordered command, broadcast to every peer including the origin.
    Command(CommandEnvelope),
    /// The authority's promise that every envelope for `tick` has been sent.
    TickSeal { tick: Tick },
    /// A peer's confirmation that it has executed through `tick`.
    TickAck { tick: Tick },
    Disconnect(DisconnectReason),
}

impl Serde for Packet {
    fn ser(&self, writer: &mut ByteWriter) {
        match self {
            Packet::JoinRequest {
                username,
                engine_version,
                session_version,
                fingerprint,
            } => {
                writer.write_u8(0);
                writer.write_string(username);
                writer.write_string(engine_version);
                writer.write_string(session_version);
                writer.write_bytes(fingerprint);
            }
            Packet::JoinResponse {
                engine_version,
                session_version,
                result,
                peer_id,
                baseline_tick,
                lookahead,
            } => {
                writer.write_u8(1);
                writer.write_string(engine_version);
                writer.write_string(session_version);
                result.ser(writer);
                writer.write_u32(*peer_id);
                writer.write_u32(*baseline_tick);
                writer.write_u32(*lookahead);
            }
            Packet::Request { op, args } => {
                writer.write_u8(2);
                writer.write_u16(*op);
                writer.write_bytes(args);
            }
            Packet::Command(envelope) => {
                writer.write_u8(3);
                envelope.ser(writer);
            }
            Packet::TickSeal { tick } => {
                writer.write_u8(4);
                writer.write_u32(*tick);
            }
            Packet::TickAck { tick } => {
                writer.write_u8(5);
                writer.write_u32(*tick);
            }
            Packet::Disconnect(reason) => {
                writer.write_u8(6);
                reason.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        match reader.read_u8()? {
            0 => Ok(Packet::JoinRequest {
                username: reader.read_string(MAX_STRING_LEN)?,
                engine_version: reader.read_string(MAX_STRING_LEN)?,
                session_version: reader.read_string(MAX_STRING_LEN)?,
                fingerprint: reader.read_bytes(MAX_FINGERPRINT_LEN)?,
            }),
            1 => Ok(Packet::JoinResponse {
                engine_version: reader.read_string(MAX_STRING_LEN)?,
                session_version: reader.read_string(MAX_STRING_LEN)?,
                result: HandshakeResult::de(reader)?,
                peer_id: reader.read_u32()?,
                baseline_tick: reader.read_u32()?,
                lookahead: reader.read_u32()?,
            }),
            2 => Ok(Packet::Request {
                op: reader.read_u16()?,
                args: reader.read_bytes(MAX_ARGS_LEN)?,
            }),
            3 => Ok(Packet::Command(CommandEnvelope::de(reader)?)),
            4 => Ok(Packet::TickSeal {
                tick: reader.read_u32()?,
            }),
            5 => Ok(Packet::TickAck {
                tick: reader.read_u32()?,
            }),
            6 => Ok(Packet::Disconnect(DisconnectReason::de(reader)?)),
            _ => Err(CodecError::FormatError("invalid packet type byte")),
        }
    }
}

// Tests
