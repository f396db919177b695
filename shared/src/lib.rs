//! # Tandem Shared
//! Common functionality shared between tandem-server & tandem-client crates:
//! the content fingerprint model and builder, the join handshake, command
//! envelopes and the deterministic tick scheduler that replays them.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tandem_serde::{
    compress, decompress, ByteReader, ByteWriter, CodecError, Serde, MAX_STRING_LEN,
};

pub mod command;
pub mod fingerprint;
pub mod handshake;
pub mod scheduler;

mod constants;
mod disconnect;
mod error;
mod hook;
mod packet;
mod session;
mod types;

pub use command::{
    dispatcher::{Dispatcher, PendingCommand},
    envelope::CommandEnvelope,
    error::CommandError,
    registry::OpRegistry,
};
pub use constants::{
    MAX_ARGS_LEN, MAX_CONFIG_CONTENT_LEN, MAX_FINGERPRINT_LEN, MAX_USERNAME_LEN, MIN_USERNAME_LEN,
};
pub use disconnect::DisconnectReason;
pub use error::ProtocolError;
pub use fingerprint::{
    builder::{ContentProvider, FingerprintBuilder, SettingsLocatorRegistry},
    error::FingerprintError,
    ConfigSnapshot, Fingerprint, ModDescriptor, ModFile, ModFileSet, ModSource,
};
pub use handshake::{compare, HandshakeResult, Mismatch};
pub use hook::Hooks;
pub use packet::Packet;
pub use scheduler::{
    executor::{Advance, ExecContext, Executor, LocalEffects, NoLocalEffects},
    queue::ExecutionQueue,
    SharedState,
};
pub use session::{Session, SessionPhase};
pub use types::{OpId, PeerId, Tick};
