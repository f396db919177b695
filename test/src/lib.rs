//! Shared scaffolding for the tandem integration tests: a fake content
//! provider, a small replicated world, and loopback packet exchange between
//! one authority and several clients.


pub use helpers::*;
