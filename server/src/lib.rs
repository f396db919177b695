//! # Tandem Server
//! The ordering authority of a session: validates joining peers against its
//! own content fingerprint, assigns every replicated command its scheduled
//! tick, and broadcasts the single total order all peers replay.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod error;
mod events;
mod peer;
mod server;

pub use error::ServerError;
pub use events::{Events, ServerEvent};
pub use peer::RemotePeer;
pub use server::{Server, ServerConfig};
