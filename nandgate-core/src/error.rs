//! Error Types
//!
//! Every fallible operation on a [`Network`](crate::Network) returns a
//! [`NetworkError`] describing the concrete cause. Causes are grouped into
//! three coarse categories ([`ErrorKind`]) for callers that only care
//! whether they passed a bad argument, ran out of memory, or asked for a
//! network that cannot be evaluated.
//!
//! # Last Error
//!
//! Failing operations also record their category in a thread-local slot,
//! readable through [`last_error`]. The slot behaves like `errno`: it is
//! only meaningful immediately after a failing call, and successful calls
//! leave it untouched.

use std::cell::Cell;

use thiserror::Error;

use crate::graph::GateId;

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An allocation failed while growing storage. The operation was rolled back.
    OutOfMemory,

    /// A handle, slot index, or buffer did not satisfy the operation's contract.
    InvalidArgument,

    /// The network reached from the observed gates has a cycle or an
    /// unconnected input, so its values are undefined.
    NotEvaluable,
}

/// Errors produced by network construction, wiring and evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Storage for a gate, its slots, or a consumer registry could not be allocated.
    #[error("out of memory")]
    OutOfMemory,

    /// The handle does not name a live gate in this network.
    #[error("unknown gate {0}")]
    UnknownGate(GateId),

    /// Slot index is not below the gate's arity.
    #[error("slot {slot} out of range for gate {gate} with {arity} inputs")]
    SlotOutOfRange {
        gate: GateId,
        slot: usize,
        arity: usize,
    },

    /// Evaluation was asked to observe no gates.
    #[error("no gates to evaluate")]
    EmptyEvaluation,

    /// Output buffer length differs from the number of observed gates.
    #[error("output buffer holds {actual} values, expected {expected}")]
    OutputLengthMismatch { expected: usize, actual: usize },

    /// A dependency cycle passes through the gate.
    #[error("dependency cycle through gate {0}")]
    Cycle(GateId),

    /// An input reached during evaluation is not bound to anything.
    #[error("input {slot} of gate {gate} is unconnected")]
    Unconnected { gate: GateId, slot: usize },
}

impl NetworkError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetworkError::OutOfMemory => ErrorKind::OutOfMemory,
            NetworkError::UnknownGate(_)
            | NetworkError::SlotOutOfRange { .. }
            | NetworkError::EmptyEvaluation
            | NetworkError::OutputLengthMismatch { .. } => ErrorKind::InvalidArgument,
            NetworkError::Cycle(_) | NetworkError::Unconnected { .. } => ErrorKind::NotEvaluable,
        }
    }
}

thread_local! {
    static LAST_ERROR: Cell<Option<ErrorKind>> = const { Cell::new(None) };
}

/// Category of the most recent failure on this thread, if any.
pub fn last_error() -> Option<ErrorKind> {
    LAST_ERROR.with(Cell::get)
}

/// Forget the recorded failure.
pub fn clear_last_error() {
    LAST_ERROR.with(|slot| slot.set(None));
}

/// Record `err` as the last failure. Used with `Result::inspect_err`.
pub(crate) fn record(err: &NetworkError) {
    LAST_ERROR.with(|slot| slot.set(Some(err.kind())));
}
