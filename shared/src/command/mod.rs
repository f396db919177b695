//! Command envelopes, the operation registry, and the dispatcher that turns
//! marked operations into replicated commands.

pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod registry;
