//! External Signals
//!
//! A Signal is a boolean owned by the caller that gate inputs can read
//! without owning. The network keeps a handle to it and samples the value
//! each time it evaluates; it never writes to it.
//!
//! Clones share the same underlying value, so the caller can keep one
//! handle, wire clones into any number of slots, and flip the value between
//! evaluations.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A shared, externally owned boolean.
///
/// # Example
///
/// ```
/// use nandgate_core::{Network, Signal};
///
/// let enable = Signal::new(true);
/// let mut network = Network::new();
/// let gate = network.create(1).unwrap();
/// network.connect_signal(&enable, gate, 0).unwrap();
///
/// let mut out = [false];
/// network.evaluate(&[gate], &mut out).unwrap();
/// assert!(!out[0]);
///
/// enable.set(false);
/// network.evaluate(&[gate], &mut out).unwrap();
/// assert!(out[0]);
/// ```
#[derive(Clone)]
pub struct Signal {
    /// Unique identifier, shared by all clones.
    id: u64,

    value: Arc<AtomicBool>,
}

impl Signal {
    /// Create a new signal with the given initial value.
    pub fn new(value: bool) -> Self {
        Self {
            id: next_signal_id(),
            value: Arc::new(AtomicBool::new(value)),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current value.
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    /// Overwrite the value seen by every clone.
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    /// Flip the value, returning the new one.
    pub fn toggle(&self) -> bool {
        !self.value.fetch_xor(true, Ordering::AcqRel)
    }

    /// Whether both handles refer to the same underlying value.
    pub fn ptr_eq(&self, other: &Signal) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Signal {}

impl Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_get_and_set() {
        let signal = Signal::new(false);
        assert!(!signal.get());

        signal.set(true);
        assert!(signal.get());
    }

    #[test]
    fn signal_clone_shares_state() {
        let s1 = Signal::new(false);
        let s2 = s1.clone();

        s1.set(true);
        assert!(s2.get());
        assert_eq!(s1, s2);
        assert_eq!(s1.id(), s2.id());
    }

    #[test]
    fn toggle_returns_new_value() {
        let signal = Signal::new(false);
        assert!(signal.toggle());
        assert!(signal.get());
        assert!(!signal.toggle());
        assert!(!signal.get());
    }

    #[test]
    fn distinct_signals_are_not_equal() {
        let s1 = Signal::new(true);
        let s2 = Signal::new(true);

        assert_ne!(s1, s2);
        assert_ne!(s1.id(), s2.id());
    }
}
