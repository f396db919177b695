use std::collections::VecDeque;

use tandem_shared::{Packet, PeerId, Tick};

/// One admitted peer as the authority tracks it.
pub struct RemotePeer {
    pub id: PeerId,
    pub username: String,
    /// Highest tick this peer confirmed executing.
    pub acked_tick: Tick,
    outbox: VecDeque<Packet>,
}

impl RemotePeer {
    pub(crate) fn new(id: PeerId, username: String, baseline: Tick) -> Self {
        Self {
            id,
            username,
            acked_tick: baseline,
            outbox: VecDeque::new(),
        }
    }

    pub(crate) fn send(&mut self, packet: Packet) {
        self.outbox.push_back(packet);
    }

    /// Packets queued for this peer, in send order. The embedding's
    /// transport takes them from here.
    pub fn take_outgoing(&mut self) -> impl Iterator<Item = Packet> + '_ {
        self.outbox.drain(..)
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outbox.is_empty()
    }
}
