use std::collections::HashMap;

use crate::command::envelope::CommandEnvelope;
use crate::types::OpId;

pub type HookFn = Box<dyn Fn(&CommandEnvelope) + Send + Sync>;

struct HookSlot {
    before: Option<HookFn>,
    after: Option<HookFn>,
}

/// Call-interception registry.
///
/// The core consumes interception abstractly: an embedding registers
/// `before`/`after` callbacks against an operation id, and the executor runs
/// them around the handler. How the embedding wires these into its host
/// engine (call wrapping, vtables, instrumentation) is not our concern.
pub struct Hooks {
    table: HashMap<OpId, HookSlot>,
}

impl Hooks {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Registers hooks for `target_op`. Both callbacks are optional; a later
    /// registration for the same operation replaces the earlier one.
    pub fn register(&mut self, target_op: OpId, before: Option<HookFn>, after: Option<HookFn>) {
        self.table.insert(target_op, HookSlot { before, after });
    }

    pub fn run_before(&self, envelope: &CommandEnvelope) {
        if let Some(hook) = self.table.get(&envelope.op).and_then(|s| s.before.as_ref()) {
            hook(envelope);
        }
    }

    pub fn run_after(&self, envelope: &CommandEnvelope) {
        if let Some(hook) = self.table.get(&envelope.op).and_then(|s| s.after.as_ref()) {
            hook(envelope);
        }
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}
