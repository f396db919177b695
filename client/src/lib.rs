//! # Tandem Client
//! A joining peer: snapshots its content into a fingerprint, runs the
//! compatibility handshake against the authority, then buffers and replays
//! the ordered command stream so its simulation stays bit-identical with
//! every other peer's.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod client;
mod error;

pub use client::{Client, ClientConfig};
pub use error::ClientError;
