use std::collections::BTreeMap;

use crate::command::envelope::CommandEnvelope;
use crate::error::ProtocolError;
use crate::types::Tick;

/// Per-tick buffer of envelopes in authority-arrival order.
///
/// Append-only: envelopes are stored exactly as they arrived and are never
/// re-sorted locally. A tick, once executed, is never revisited.
pub struct ExecutionQueue {
    ticks: BTreeMap<Tick, Vec<CommandEnvelope>>,
    /// The next tick the authority has yet to seal. Ticks below this are
    /// complete: no further envelopes may arrive for them.
    next_seal: Tick,
    /// The next tick to execute. Ticks below this are gone.
    next_exec: Tick,
}

impl ExecutionQueue {
    pub fn new(baseline: Tick) -> Self {
        Self {
            ticks: BTreeMap::new(),
            next_seal: baseline,
            next_exec: baseline,
        }
    }

    /// Buffers an envelope under its scheduled tick.
    pub fn schedule(&mut self, envelope: CommandEnvelope) -> Result<(), ProtocolError> {
        let tick = envelope.scheduled_tick;
        if tick < self.next_exec {
            return Err(ProtocolError::StaleTick { tick });
        }
        if tick < self.next_seal {
            return Err(ProtocolError::SealedTick { tick });
        }
        self.ticks.entry(tick).or_default().push(envelope);
        Ok(())
    }

    /// Marks `tick` complete: every envelope for it has been delivered.
    /// Seals must arrive in tick order, each exactly once.
    pub fn seal(&mut self, tick: Tick) -> Result<(), ProtocolError> {
        if tick < self.next_seal {
            return Err(ProtocolError::DuplicateSeal { tick });
        }
        if tick > self.next_seal {
            return Err(ProtocolError::SealOutOfOrder {
                tick,
                expected: self.next_seal,
            });
        }
        self.next_seal = tick + 1;
        Ok(())
    }

    /// The next tick that would execute.
    pub fn next_tick(&self) -> Tick {
        self.next_exec
    }

    /// Whether the next tick is sealed and may execute.
    pub fn next_is_ready(&self) -> bool {
        self.next_exec < self.next_seal
    }

    /// Removes and returns the next sealed tick's envelopes, in arrival
    /// order. Returns `None` while the seal has not arrived; the caller
    /// suspends stepping rather than proceed with incomplete information.
    pub fn take_next(&mut self) -> Option<(Tick, Vec<CommandEnvelope>)> {
        if !self.next_is_ready() {
            return None;
        }
        let tick = self.next_exec;
        self.next_exec += 1;
        let envelopes = self.ticks.remove(&tick).unwrap_or_default();
        Some((tick, envelopes))
    }

    /// Envelopes buffered for not-yet-executed ticks.
    pub fn buffered(&self) -> usize {
        self.ticks.values().map(Vec::len).sum()
    }
}

// Tests
