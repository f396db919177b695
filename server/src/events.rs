use std::collections::VecDeque;

use tandem_shared::{DisconnectReason, PeerId};

/// What happened on the server since the embedding last drained events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Connected { peer: PeerId, username: String },
    Disconnected { peer: PeerId, reason: DisconnectReason },
    /// The whole session ended for everyone; no partial-tick rollback.
    SessionAborted { reason: DisconnectReason },
}

#[derive(Debug, Default)]
pub struct Events {
    queue: VecDeque<ServerEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: ServerEvent) {
        self.queue.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ServerEvent> + '_ {
        self.queue.drain(..)
    }
}
