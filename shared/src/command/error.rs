use thiserror::Error;

use tandem_serde::CodecError;

/// Errors raised while registering operations or executing one handler.
///
/// A handler failure aborts only the envelope that caused it; the executor
/// and the shared simulation continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Registration after the registry was locked.
    #[error("operation registry is locked")]
    RegistryLocked,

    /// Two registrations claimed the same operation id.
    #[error("operation id {op} registered twice ({existing} and {new})")]
    DuplicateOp {
        op: u16,
        existing: &'static str,
        new: &'static str,
    },

    /// The handler could not decode its argument blob.
    #[error(transparent)]
    MalformedArgs(#[from] CodecError),

    /// The handler itself reported a failure.
    #[error("handler for {op_name} failed: {reason}")]
    HandlerFailed {
        op_name: &'static str,
        reason: String,
    },
}
