//! Gate Network
//!
//! The network owns every gate and keeps the two directions of each edge in
//! step: whenever slot `i` of gate `c` reads gate `p`, `p`'s consumer
//! registry holds one entry for `c`, and every registry entry corresponds to
//! exactly one such slot. Each mutating operation restores this before it
//! returns, including on failure.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{self, NetworkError};
use crate::signal::Signal;

use super::gate::{Gate, GateId, Input};

/// An arena of NAND gates wired into a combinational network.
#[derive(Debug, Default)]
pub struct Network {
    /// All gates, indexed by ID.
    pub(super) gates: IndexMap<GateId, Gate>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self {
            gates: IndexMap::new(),
        }
    }

    /// Create an empty network with room for `capacity` gates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            gates: IndexMap::with_capacity(capacity),
        }
    }

    /// Add a gate with `arity` unconnected inputs.
    ///
    /// A gate with no inputs is allowed and always evaluates to `false`.
    pub fn create(&mut self, arity: usize) -> Result<GateId, NetworkError> {
        self.try_create(arity).inspect_err(error::record)
    }

    fn try_create(&mut self, arity: usize) -> Result<GateId, NetworkError> {
        self.gates
            .try_reserve(1)
            .map_err(|_| NetworkError::OutOfMemory)?;
        let gate = Gate::new(arity)?;
        let id = gate.id();
        self.gates.insert(id, gate);
        trace!(gate = %id, arity, "created gate");
        Ok(id)
    }

    /// Remove a gate and every edge touching it.
    ///
    /// Slots of other gates that read the removed gate become unconnected.
    /// Returns `false` if `id` is not in the network.
    pub fn delete(&mut self, id: GateId) -> bool {
        let Some(gate) = self.gates.swap_remove(&id) else {
            return false;
        };

        // Detach from producers. A self-loop needs no work here since the
        // gate is already out of the map.
        for producer in gate.inputs().iter().filter_map(Input::as_gate) {
            if let Some(producer) = self.gates.get_mut(&producer) {
                producer.consumers_mut().remove(id);
            }
        }

        // Detach consumers. A consumer listed more than once is fully
        // cleared on its first visit.
        for consumer in gate.consumers().iter() {
            if consumer == id {
                continue;
            }
            if let Some(consumer) = self.gates.get_mut(&consumer) {
                consumer.clear_inputs_from(id);
            }
        }

        trace!(gate = %id, fan_out = gate.consumers().len(), "deleted gate");
        true
    }

    /// Wire slot `slot` of `consumer` to the output of `producer`.
    ///
    /// Any previous gate binding of the slot is detached first, so its
    /// producer loses one consumer entry and `producer` gains one, even when
    /// both are the same gate.
    pub fn connect_gate(
        &mut self,
        producer: GateId,
        consumer: GateId,
        slot: usize,
    ) -> Result<(), NetworkError> {
        self.try_connect_gate(producer, consumer, slot)
            .inspect_err(error::record)
    }

    fn try_connect_gate(
        &mut self,
        producer: GateId,
        consumer: GateId,
        slot: usize,
    ) -> Result<(), NetworkError> {
        self.gate(consumer)?.check_slot(slot)?;

        // Reserve before mutating so a failed allocation leaves no trace.
        self.gate_mut(producer)?.consumers_mut().reserve_one()?;

        let previous = self
            .gate_mut(consumer)?
            .replace_input(slot, Input::Gate(producer));
        self.detach(consumer, &previous);
        self.gate_mut(producer)?.consumers_mut().add(consumer)?;

        trace!(%producer, %consumer, slot, "connected gate");
        Ok(())
    }

    /// Wire slot `slot` of `consumer` to an external signal.
    pub fn connect_signal(
        &mut self,
        signal: &Signal,
        consumer: GateId,
        slot: usize,
    ) -> Result<(), NetworkError> {
        self.try_connect_signal(signal, consumer, slot)
            .inspect_err(error::record)
    }

    fn try_connect_signal(
        &mut self,
        signal: &Signal,
        consumer: GateId,
        slot: usize,
    ) -> Result<(), NetworkError> {
        let gate = self.gate_mut(consumer)?;
        gate.check_slot(slot)?;
        let previous = gate.replace_input(slot, Input::Signal(signal.clone()));
        self.detach(consumer, &previous);

        trace!(signal = signal.id(), %consumer, slot, "connected signal");
        Ok(())
    }

    /// Unbind slot `slot` of `consumer`, returning what it was bound to.
    pub fn disconnect(&mut self, consumer: GateId, slot: usize) -> Result<Input, NetworkError> {
        self.try_disconnect(consumer, slot)
            .inspect_err(error::record)
    }

    fn try_disconnect(&mut self, consumer: GateId, slot: usize) -> Result<Input, NetworkError> {
        let gate = self.gate_mut(consumer)?;
        gate.check_slot(slot)?;
        let previous = gate.replace_input(slot, Input::Unconnected);
        self.detach(consumer, &previous);
        Ok(previous)
    }

    /// Drop the registry entry behind a binding that `consumer` just replaced.
    fn detach(&mut self, consumer: GateId, previous: &Input) {
        if let Some(producer) = previous.as_gate() {
            if let Some(producer) = self.gates.get_mut(&producer) {
                producer.consumers_mut().remove(consumer);
            }
        }
    }

    /// Number of consumer entries registered on `id`.
    pub fn fan_out(&self, id: GateId) -> Result<usize, NetworkError> {
        self.gate(id)
            .map(|gate| gate.consumers().len())
            .inspect_err(error::record)
    }

    /// Current binding of slot `slot` of `id`.
    pub fn input(&self, id: GateId, slot: usize) -> Result<&Input, NetworkError> {
        self.try_input(id, slot).inspect_err(error::record)
    }

    fn try_input(&self, id: GateId, slot: usize) -> Result<&Input, NetworkError> {
        let gate = self.gate(id)?;
        gate.check_slot(slot)?;
        Ok(&gate.inputs()[slot])
    }

    /// The `index`-th consumer of `id`, in unspecified order.
    ///
    /// Returns `None` unless `index < fan_out(id)`.
    pub fn output(&self, id: GateId, index: usize) -> Option<GateId> {
        self.gates.get(&id)?.consumers().get(index)
    }

    /// Iterate over the consumer entries of `id`.
    pub fn outputs(&self, id: GateId) -> Result<impl Iterator<Item = GateId> + '_, NetworkError> {
        self.gate(id)
            .map(|gate| gate.consumers().iter())
            .inspect_err(error::record)
    }

    /// Number of input slots of `id`.
    pub fn arity(&self, id: GateId) -> Result<usize, NetworkError> {
        self.gate(id).map(Gate::arity).inspect_err(error::record)
    }

    /// Get a reference to a gate.
    pub fn get(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(&id)
    }

    pub fn contains(&self, id: GateId) -> bool {
        self.gates.contains_key(&id)
    }

    /// Get the total number of gates in the network.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Iterate over the IDs of all live gates.
    pub fn gates(&self) -> impl Iterator<Item = GateId> + '_ {
        self.gates.keys().copied()
    }

    pub(super) fn gate(&self, id: GateId) -> Result<&Gate, NetworkError> {
        self.gates.get(&id).ok_or(NetworkError::UnknownGate(id))
    }

    pub(super) fn gate_mut(&mut self, id: GateId) -> Result<&mut Gate, NetworkError> {
        self.gates.get_mut(&id).ok_or(NetworkError::UnknownGate(id))
    }
}
