use std::collections::HashMap;

use tandem_serde::ByteReader;

use crate::command::error::CommandError;
use crate::error::ProtocolError;
use crate::scheduler::executor::ExecContext;
use crate::types::OpId;

/// A replicated operation's handler. Receives the shared state, a reader
/// over the serialized arguments, and the execution context.
pub type OpHandler<S> = Box<
    dyn Fn(&mut S, &mut ByteReader<'_>, &mut ExecContext<'_>) -> Result<(), CommandError>
        + Send
        + Sync,
>;

struct OpEntry<S> {
    name: &'static str,
    handler: OpHandler<S>,
}

/// Stable identifier -> (name, handler) table.
///
/// Built once at startup and locked before the first envelope is decoded;
/// every peer must build an identical table or envelopes will not resolve.
/// An unknown operation id on decode is connection-fatal.
pub struct OpRegistry<S> {
    ops: HashMap<OpId, OpEntry<S>>,
    locked: bool,
}

impl<S> OpRegistry<S> {
    pub fn new() -> Self {
        Self {
            ops: HashMap::new(),
            locked: false,
        }
    }

    pub fn register(
        &mut self,
        op: OpId,
        name: &'static str,
        handler: OpHandler<S>,
    ) -> Result<(), CommandError> {
        if self.locked {
            return Err(CommandError::RegistryLocked);
        }
        if let Some(existing) = self.ops.get(&op) {
            return Err(CommandError::DuplicateOp {
                op,
                existing: existing.name,
                new: name,
            });
        }
        self.ops.insert(op, OpEntry { name, handler });
        Ok(())
    }

    /// No further registrations are accepted after this; must be called
    /// before handling any remote input.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn contains(&self, op: OpId) -> bool {
        self.ops.contains_key(&op)
    }

    pub fn name_of(&self, op: OpId) -> Option<&'static str> {
        self.ops.get(&op).map(|e| e.name)
    }

    pub(crate) fn resolve(
        &self,
        op: OpId,
    ) -> Result<(&'static str, &OpHandler<S>), ProtocolError> {
        let entry = self.ops.get(&op).ok_or(ProtocolError::UnknownOp { op })?;
        Ok((entry.name, &entry.handler))
    }
}

impl<S> Default for OpRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

// Tests
