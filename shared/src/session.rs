use crate::types::{PeerId, Tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Fingerprint built, handshake in flight. No envelopes accepted yet.
    Joining,
    /// Handshake accepted; the peer participates in the replication stream.
    Playing,
    /// Rejected, disconnected, or shut down.
    Ended,
}

/// Per-join-attempt context, passed by reference to every component.
///
/// Lives from the start of a join attempt until accept/reject or session
/// end. There is deliberately no process-wide singleton behind this.
#[derive(Debug, Clone)]
pub struct Session {
    pub local_peer: PeerId,
    pub engine_version: String,
    pub session_version: String,
    pub lookahead: Tick,
    pub authority: bool,
    phase: SessionPhase,
}

impl Session {
    pub fn new_joining(
        local_peer: PeerId,
        engine_version: impl Into<String>,
        session_version: impl Into<String>,
        lookahead: Tick,
        authority: bool,
    ) -> Self {
        Self {
            local_peer,
            engine_version: engine_version.into(),
            session_version: session_version.into(),
            lookahead,
            authority,
            phase: SessionPhase::Joining,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Transition `Joining -> Playing`. Only valid once the handshake has
    /// fully accepted the peer.
    pub fn begin_play(&mut self) {
        debug_assert_eq!(self.phase, SessionPhase::Joining);
        self.phase = SessionPhase::Playing;
    }

    pub fn end(&mut self) {
        self.phase = SessionPhase::Ended;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}
