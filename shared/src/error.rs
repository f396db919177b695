use thiserror::Error;

use tandem_serde::CodecError;

use crate::types::{OpId, Tick};

/// Session-fatal protocol violations.
///
/// Anything here means the two sides no longer agree on the stream and the
/// connection must be torn down; none of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// An envelope referenced an operation id missing from the registry.
    #[error("unknown operation id {op}")]
    UnknownOp { op: OpId },

    /// An envelope was scheduled onto a tick that has already executed.
    #[error("envelope scheduled for already-executed tick {tick}")]
    StaleTick { tick: Tick },

    /// An envelope arrived for a tick the authority already sealed.
    #[error("envelope arrived for sealed tick {tick}")]
    SealedTick { tick: Tick },

    /// The authority sealed the same tick twice.
    #[error("duplicate seal for tick {tick}")]
    DuplicateSeal { tick: Tick },

    /// A seal arrived for a tick other than the next unsealed one.
    #[error("seal for tick {tick} out of order, expected {expected}")]
    SealOutOfOrder { tick: Tick, expected: Tick },

    /// Wire-level decode failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
