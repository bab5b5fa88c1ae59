//! Gates
//!
//! This module defines the gate type that lives in the network, its input
//! slots, and the scratch state used while evaluating.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::error::NetworkError;
use crate::signal::Signal;

use super::consumers::Consumers;

/// Unique identifier for a gate.
///
/// Identifiers are never reused, so a handle to a deleted gate can never
/// alias a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GateId(u64);

impl GateId {
    /// Generate a new unique gate ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for GateId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for GateId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an input slot is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Input {
    /// Nothing. A gate with an unconnected input cannot be evaluated.
    #[default]
    Unconnected,

    /// An externally owned boolean.
    Signal(Signal),

    /// The output of another gate (possibly this one).
    Gate(GateId),
}

impl Input {
    pub fn is_connected(&self) -> bool {
        !matches!(self, Input::Unconnected)
    }

    /// The producer gate, if this slot reads one.
    pub fn as_gate(&self) -> Option<GateId> {
        match self {
            Input::Gate(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_signal(&self) -> Option<&Signal> {
        match self {
            Input::Signal(signal) => Some(signal),
            _ => None,
        }
    }
}

/// Traversal state of a gate during evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mark {
    /// Not reached by the current evaluation. Every gate is idle between calls.
    #[default]
    Idle,

    /// On the current traversal path. Reaching it again means a cycle.
    InProgress,

    /// Evaluated; `value` and `critical_len` are valid.
    Done,
}

/// A NAND gate with a fixed number of inputs.
#[derive(Debug)]
pub struct Gate {
    /// Unique identifier for this gate.
    id: GateId,

    /// One binding per input. Length is the arity and never changes.
    inputs: SmallVec<[Input; 4]>,

    /// Gates reading this gate's output, one entry per wired slot.
    consumers: Consumers,

    /// Scratch state, meaningful only while `mark == Done`.
    pub(crate) mark: Mark,
    pub(crate) value: bool,
    pub(crate) critical_len: usize,
}

impl Gate {
    /// Create a gate with `arity` unconnected inputs.
    pub fn new(arity: usize) -> Result<Self, NetworkError> {
        let mut inputs = SmallVec::new();
        inputs
            .try_reserve_exact(arity)
            .map_err(|_| NetworkError::OutOfMemory)?;
        inputs.resize(arity, Input::Unconnected);

        Ok(Self {
            id: GateId::new(),
            inputs,
            consumers: Consumers::new(),
            mark: Mark::Idle,
            value: false,
            critical_len: 0,
        })
    }

    /// Get the gate's ID.
    pub fn id(&self) -> GateId {
        self.id
    }

    /// Number of input slots.
    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// Binding of slot `slot`, if in range.
    pub fn input(&self, slot: usize) -> Option<&Input> {
        self.inputs.get(slot)
    }

    /// All input bindings in slot order.
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn consumers(&self) -> &Consumers {
        &self.consumers
    }

    pub(crate) fn consumers_mut(&mut self) -> &mut Consumers {
        &mut self.consumers
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Rebind one slot, returning the previous binding.
    pub(crate) fn replace_input(&mut self, slot: usize, input: Input) -> Input {
        std::mem::replace(&mut self.inputs[slot], input)
    }

    /// Reset every slot reading `producer` to unconnected.
    ///
    /// Returns how many slots were cleared.
    pub(crate) fn clear_inputs_from(&mut self, producer: GateId) -> usize {
        let mut cleared = 0;
        for input in self.inputs.iter_mut() {
            if input.as_gate() == Some(producer) {
                *input = Input::Unconnected;
                cleared += 1;
            }
        }
        cleared
    }

    /// Check `slot` against the arity.
    pub(crate) fn check_slot(&self, slot: usize) -> Result<(), NetworkError> {
        if slot < self.arity() {
            Ok(())
        } else {
            Err(NetworkError::SlotOutOfRange {
                gate: self.id,
                slot,
                arity: self.arity(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_ids_are_unique() {
        let id1 = GateId::new();
        let id2 = GateId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn new_gate_is_idle_and_unconnected() {
        let gate = Gate::new(3).unwrap();
        assert_eq!(gate.arity(), 3);
        assert_eq!(gate.mark(), Mark::Idle);
        assert!(gate.inputs().iter().all(|input| !input.is_connected()));
        assert!(gate.consumers().is_empty());
    }

    #[test]
    fn zero_arity_gate_has_no_slots() {
        let gate = Gate::new(0).unwrap();
        assert_eq!(gate.arity(), 0);
        assert!(gate.input(0).is_none());
        assert!(gate.check_slot(0).is_err());
    }

    #[test]
    fn check_slot_reports_arity() {
        let gate = Gate::new(2).unwrap();
        assert!(gate.check_slot(1).is_ok());
        assert_eq!(
            gate.check_slot(2),
            Err(NetworkError::SlotOutOfRange {
                gate: gate.id(),
                slot: 2,
                arity: 2,
            })
        );
    }

    #[test]
    fn clear_inputs_from_clears_every_match() {
        let mut gate = Gate::new(3).unwrap();
        let producer = GateId::new();
        let other = GateId::new();

        gate.replace_input(0, Input::Gate(producer));
        gate.replace_input(1, Input::Gate(other));
        gate.replace_input(2, Input::Gate(producer));

        assert_eq!(gate.clear_inputs_from(producer), 2);
        assert_eq!(gate.input(0), Some(&Input::Unconnected));
        assert_eq!(gate.input(1), Some(&Input::Gate(other)));
        assert_eq!(gate.input(2), Some(&Input::Unconnected));
    }

    #[test]
    fn replace_input_returns_previous_binding() {
        let mut gate = Gate::new(1).unwrap();
        let signal = Signal::new(true);
        let producer = GateId::new();

        assert_eq!(gate.replace_input(0, Input::Signal(signal.clone())), Input::Unconnected);
        assert_eq!(gate.replace_input(0, Input::Gate(producer)), Input::Signal(signal));
        assert_eq!(gate.input(0).and_then(Input::as_gate), Some(producer));
    }

    #[test]
    fn display_shows_raw_id() {
        assert_eq!(GateId::from(7).to_string(), "#7");
    }
}
