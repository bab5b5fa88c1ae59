//! Evaluation
//!
//! Computes the output of a set of observed gates together with the
//! critical path length, the longest chain of gates any of them depends on.
//!
//! # Algorithm
//!
//! A depth-first walk backward from each observed gate through its inputs,
//! using an explicit stack so that deep chains cannot overflow the call
//! stack. Each gate carries a three-state mark:
//!
//! 1. `Idle` gates have not been reached yet; reaching one pushes it.
//! 2. `InProgress` gates are on the current path; reaching one means the
//!    walk closed a cycle.
//! 3. `Done` gates hold a memoized value and critical length, shared by
//!    every observed gate in the same call.
//!
//! A gate's value is true iff at least one input is false. Its critical
//! length is one more than the longest among its inputs, where a signal
//! counts as zero. A gate without inputs is `false` with length zero.
//!
//! After the walk, successful or not, a second walk resets every marked gate
//! to `Idle` so the network is ready for the next call.

use smallvec::SmallVec;
use tracing::{debug, debug_span};

use crate::error::{self, NetworkError};

use super::gate::{GateId, Input, Mark};
use super::network::Network;

/// Result of [`Network::evaluate_to_vec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Output of each observed gate, in the order they were given.
    pub values: Vec<bool>,
    /// Longest dependency chain ending at any observed gate.
    pub critical_path: usize,
}

/// A gate whose inputs are being walked.
#[derive(Debug)]
struct Frame {
    gate: GateId,
    /// Next input slot to look at.
    slot: usize,
    /// OR of the negated inputs seen so far.
    value: bool,
    /// Longest chain among the inputs seen so far.
    depth: usize,
}

impl Frame {
    fn new(gate: GateId) -> Self {
        Self {
            gate,
            slot: 0,
            value: false,
            depth: 0,
        }
    }

    /// Account for one resolved input and move to the next slot.
    fn fold(&mut self, input_value: bool, input_len: usize) {
        self.value |= !input_value;
        self.depth = self.depth.max(input_len);
        self.slot += 1;
    }
}

/// What to do with the next slot of the top frame.
enum Step {
    /// Input resolved to a value and chain length.
    Fold(bool, usize),
    /// Producer must be evaluated first.
    Descend(GateId),
    /// All inputs seen.
    Finish,
}

impl Network {
    /// Evaluate `gates`, writing each output into the matching entry of `out`.
    ///
    /// Returns the critical path length: the longest chain of gates ending at
    /// any observed gate.
    ///
    /// # Errors
    ///
    /// - `EmptyEvaluation`, `OutputLengthMismatch` or `UnknownGate` if the
    ///   arguments are invalid. Nothing is evaluated.
    /// - `Cycle` or `Unconnected` if some observed gate depends on a cycle
    ///   or an unbound input.
    ///
    /// On failure `out` is left untouched and every gate is idle again.
    pub fn evaluate(&mut self, gates: &[GateId], out: &mut [bool]) -> Result<usize, NetworkError> {
        let _span = debug_span!("evaluate", observed = gates.len()).entered();
        self.try_evaluate(gates, out).inspect_err(|err| {
            debug!(error = %err, "evaluation failed");
            error::record(err);
        })
    }

    /// Evaluate `gates` into a freshly allocated buffer.
    pub fn evaluate_to_vec(&mut self, gates: &[GateId]) -> Result<Evaluation, NetworkError> {
        let mut values = vec![false; gates.len()];
        let critical_path = self.evaluate(gates, &mut values)?;
        Ok(Evaluation {
            values,
            critical_path,
        })
    }

    fn try_evaluate(&mut self, gates: &[GateId], out: &mut [bool]) -> Result<usize, NetworkError> {
        if gates.is_empty() {
            return Err(NetworkError::EmptyEvaluation);
        }
        if gates.len() != out.len() {
            return Err(NetworkError::OutputLengthMismatch {
                expected: gates.len(),
                actual: out.len(),
            });
        }
        for &id in gates {
            self.gate(id)?;
        }

        let result = self.propagate_all(gates);
        let values = result.map(|critical_path| {
            let values: SmallVec<[bool; 16]> = gates
                .iter()
                .map(|id| self.gates.get(id).is_some_and(|gate| gate.value))
                .collect();
            (values, critical_path)
        });
        self.reset(gates);

        let (values, critical_path) = values?;
        out.copy_from_slice(&values);
        debug!(critical_path, "evaluation finished");
        Ok(critical_path)
    }

    /// Evaluate every observed gate, sharing memoized results.
    fn propagate_all(&mut self, gates: &[GateId]) -> Result<usize, NetworkError> {
        let mut stack = Vec::new();
        let mut critical_path = 0;
        for &id in gates {
            critical_path = critical_path.max(self.propagate(id, &mut stack)?);
        }
        Ok(critical_path)
    }

    /// Evaluate one gate and everything it depends on.
    fn propagate(&mut self, root: GateId, stack: &mut Vec<Frame>) -> Result<usize, NetworkError> {
        let gate = self.gate_mut(root)?;
        if gate.mark == Mark::Done {
            return Ok(gate.critical_len);
        }
        gate.mark = Mark::InProgress;
        stack.clear();
        stack.push(Frame::new(root));

        while let Some(frame) = stack.last_mut() {
            match self.next_step(frame)? {
                Step::Fold(value, len) => frame.fold(value, len),
                Step::Descend(producer) => {
                    self.gate_mut(producer)?.mark = Mark::InProgress;
                    stack.push(Frame::new(producer));
                }
                Step::Finish => {
                    let Frame {
                        gate: id,
                        value,
                        depth,
                        ..
                    } = *frame;
                    let gate = self.gate_mut(id)?;
                    // Zero inputs: false with length zero.
                    let len = if gate.arity() == 0 { 0 } else { depth + 1 };
                    gate.value = value;
                    gate.critical_len = len;
                    gate.mark = Mark::Done;

                    stack.pop();
                    if let Some(parent) = stack.last_mut() {
                        parent.fold(value, len);
                    }
                }
            }
        }

        Ok(self.gate(root)?.critical_len)
    }

    fn next_step(&self, frame: &Frame) -> Result<Step, NetworkError> {
        let gate = self.gate(frame.gate)?;
        let Some(input) = gate.input(frame.slot) else {
            return Ok(Step::Finish);
        };

        match input {
            Input::Unconnected => Err(NetworkError::Unconnected {
                gate: frame.gate,
                slot: frame.slot,
            }),
            Input::Signal(signal) => Ok(Step::Fold(signal.get(), 0)),
            Input::Gate(producer) => {
                let producer_gate = self.gate(*producer)?;
                match producer_gate.mark {
                    Mark::Idle => Ok(Step::Descend(*producer)),
                    Mark::InProgress => Err(NetworkError::Cycle(*producer)),
                    Mark::Done => Ok(Step::Fold(
                        producer_gate.value,
                        producer_gate.critical_len,
                    )),
                }
            }
        }
    }

    /// Return every gate reachable from `gates` to `Idle`.
    fn reset(&mut self, gates: &[GateId]) {
        let mut stack: Vec<GateId> = gates.to_vec();

        while let Some(id) = stack.pop() {
            let Some(gate) = self.gates.get_mut(&id) else {
                continue;
            };
            if gate.mark == Mark::Idle {
                continue;
            }
            gate.mark = Mark::Idle;
            stack.extend(gate.inputs().iter().filter_map(Input::as_gate));
        }
    }
}
