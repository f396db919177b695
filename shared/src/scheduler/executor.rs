use log::error;

use tandem_serde::ByteReader;

use crate::command::envelope::CommandEnvelope;
use crate::command::registry::OpRegistry;
use crate::error::ProtocolError;
use crate::hook::Hooks;
use crate::scheduler::queue::ExecutionQueue;
use crate::scheduler::SharedState;
use crate::types::{OpId, PeerId, Tick};

/// Peer-local side effects gated on `locally_issued`.
///
/// These must never be derived from replicated state: only the peer whose
/// action produced a command performs them, so routing them through shared
/// state would desync every other peer.
pub trait LocalEffects {
    /// Move this peer's view to a target (camera jump after map creation).
    fn focus_camera(&mut self, _target: u64) {}

    /// Reassign which shared-state identity this peer plays as.
    fn assign_identity(&mut self, _identity: u64) {}

    /// Queue a follow-up outbound command; the embedding routes it back
    /// through the dispatcher, never invokes it inline.
    fn send_followup(&mut self, _op: OpId, _args: Vec<u8>) {}

    /// Non-authoritative local notice, e.g. that this peer's own command
    /// failed. Other peers see nothing.
    fn notify(&mut self, _message: &str) {}
}

/// For peers (and tests) with nothing to show.
pub struct NoLocalEffects;

impl LocalEffects for NoLocalEffects {}

/// What the executor is handed while running one envelope.
pub struct ExecContext<'a> {
    pub origin: PeerId,
    pub tick: Tick,
    /// True only on the issuing peer; gates every `LocalEffects` call.
    pub locally_issued: bool,
    pub effects: &'a mut dyn LocalEffects,
}

impl<'a> ExecContext<'a> {
    /// Runs `f` against the effects sink only when this envelope was issued
    /// by the local peer.
    pub fn local_only(&mut self, f: impl FnOnce(&mut dyn LocalEffects)) {
        if self.locally_issued {
            f(self.effects);
        }
    }
}

/// Result of one `try_advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// One tick executed.
    Executed { tick: Tick, commands: usize },
    /// The next tick's seal has not arrived; stepping is suspended.
    Waiting,
}

/// Drains the execution queue on the one logical simulation thread.
///
/// Envelopes for a tick run in the authority's arrival order, never
/// re-sorted. A handler failure aborts only that envelope: it is logged
/// with its context and the tick continues, because every peer fails the
/// same way on the same envelope.
pub struct Executor<S> {
    registry: OpRegistry<S>,
    hooks: Hooks,
    queue: ExecutionQueue,
}

impl<S: SharedState> Executor<S> {
    pub fn new(mut registry: OpRegistry<S>, baseline: Tick) -> Self {
        registry.lock();
        Self {
            registry,
            hooks: Hooks::new(),
            queue: ExecutionQueue::new(baseline),
        }
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> &OpRegistry<S> {
        &self.registry
    }

    pub fn current_tick(&self) -> Tick {
        self.queue.next_tick()
    }

    pub fn buffered(&self) -> usize {
        self.queue.buffered()
    }

    /// Buffers an incoming envelope. An unknown operation id is rejected
    /// here, before the envelope can reach a tick.
    pub fn schedule(&mut self, envelope: CommandEnvelope) -> Result<(), ProtocolError> {
        if !self.registry.contains(envelope.op) {
            return Err(ProtocolError::UnknownOp { op: envelope.op });
        }
        self.queue.schedule(envelope)
    }

    /// Records the authority's seal for `tick`.
    pub fn seal_tick(&mut self, tick: Tick) -> Result<(), ProtocolError> {
        self.queue.seal(tick)
    }

    /// Executes the next tick if it is sealed, otherwise reports `Waiting`.
    pub fn try_advance(&mut self, state: &mut S, effects: &mut dyn LocalEffects) -> Advance {
        let Some((tick, envelopes)) = self.queue.take_next() else {
            return Advance::Waiting;
        };

        let commands = envelopes.len();
        for envelope in envelopes {
            self.execute(state, effects, tick, envelope);
        }

        Advance::Executed { tick, commands }
    }

    fn execute(
        &self,
        state: &mut S,
        effects: &mut dyn LocalEffects,
        tick: Tick,
        envelope: CommandEnvelope,
    ) {
        // schedule() verified the op, so resolution cannot fail here.
        let Ok((name, handler)) = self.registry.resolve(envelope.op) else {
            return;
        };

        self.hooks.run_before(&envelope);

        let mut context = ExecContext {
            origin: envelope.origin,
            tick,
            locally_issued: envelope.locally_issued,
            effects,
        };
        let mut args = ByteReader::new(&envelope.args);

        if let Err(err) = handler(state, &mut args, &mut context) {
            error!(
                "command {} (op {}) from peer {} failed at tick {}: {}",
                name, envelope.op, envelope.origin, tick, err
            );
            context.local_only(|effects| {
                effects.notify(&format!("command {name} failed: {err}"));
            });
        }

        self.hooks.run_after(&envelope);
    }
}

// Tests
