use thiserror::Error;

use tandem_shared::{CodecError, PeerId, ProtocolError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// A packet referenced a peer the server does not know.
    #[error("unknown peer {peer}")]
    UnknownPeer { peer: PeerId },

    /// A peer sent a packet type the server never accepts.
    #[error("unexpected {packet} packet from peer {peer}")]
    UnexpectedPacket { peer: PeerId, packet: &'static str },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
