//! Tick-indexed scheduling and deterministic execution of command
//! envelopes. The single total order established here is the sole source of
//! cross-peer determinism.

pub mod executor;
pub mod queue;

/// Replicated simulation state as the executor sees it.
///
/// All writes happen on the one logical simulation thread, driven solely by
/// executed envelopes.
pub trait SharedState {
    /// Hash of the replicated state, compared across peers to detect
    /// desyncs. Must be a pure function of replicated data only.
    fn state_hash(&self) -> u64;
}
