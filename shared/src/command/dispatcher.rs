use std::collections::VecDeque;

use tandem_serde::ByteWriter;

use crate::types::OpId;

/// A command awaiting a tick from the ordering authority.
///
/// The authority turns a pending command into a `CommandEnvelope` by
/// stamping the origin peer and the scheduled tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommand {
    pub op: OpId,
    pub args: Vec<u8>,
    /// True only on the peer whose action produced the command.
    pub locally_issued: bool,
}

/// Turns marked operations into outgoing commands.
///
/// This is the single funnel for shared-state mutation: player actions and
/// background-work completions both pass through `invoke`, get serialized,
/// and wait for the authority to order them. Nothing mutates shared state
/// directly.
pub struct Dispatcher {
    outgoing: VecDeque<PendingCommand>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            outgoing: VecDeque::new(),
        }
    }

    /// Serializes `write_args` through the wire codec and queues the command
    /// for the authority. `issued_by_local_peer` is only meaningful on the
    /// initiating peer and never leaves it.
    pub fn invoke(
        &mut self,
        op: OpId,
        issued_by_local_peer: bool,
        write_args: impl FnOnce(&mut ByteWriter),
    ) {
        let mut writer = ByteWriter::new();
        write_args(&mut writer);
        self.outgoing.push_back(PendingCommand {
            op,
            args: writer.to_bytes(),
            locally_issued: issued_by_local_peer,
        });
    }

    /// Queues a command whose arguments are already serialized (the
    /// background-completion path).
    pub fn invoke_raw(&mut self, op: OpId, args: Vec<u8>, issued_by_local_peer: bool) {
        self.outgoing.push_back(PendingCommand {
            op,
            args,
            locally_issued: issued_by_local_peer,
        });
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PendingCommand> + '_ {
        self.outgoing.drain(..)
    }

    pub fn pending(&self) -> usize {
        self.outgoing.len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

// Tests
