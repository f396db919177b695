use thiserror::Error;

use tandem_shared::{
    CodecError, DisconnectReason, FingerprintError, HandshakeResult, ProtocolError,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The authority refused this peer's content. Recoverable: the user
    /// sees the structured diff and may retry the whole handshake from
    /// scratch; there is no partial re-handshake.
    #[error("handshake rejected with {} mismatches", result.mismatches.len())]
    HandshakeMismatch { result: HandshakeResult },

    /// The authority dropped us.
    #[error("disconnected by the authority")]
    Disconnected { reason: DisconnectReason },

    /// A packet arrived that is invalid in the session's current phase.
    #[error("unexpected {packet} packet in phase {phase}")]
    UnexpectedPacket {
        packet: &'static str,
        phase: &'static str,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
