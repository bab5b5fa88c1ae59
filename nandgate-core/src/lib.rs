//! NAND Gate Core
//!
//! This crate models combinational networks of NAND gates. It implements:
//!
//! - A gate arena with bidirectional edge bookkeeping
//! - Wiring of gate inputs to other gates or to external signals
//! - Evaluation of observed gates with cycle and open-input detection
//! - Critical path length computation in the same traversal
//!
//! # Architecture
//!
//! - `graph`: gates, the consumer registry, the network and its evaluator
//! - `signal`: externally owned booleans that inputs can read
//! - `error`: error types and the thread-local last-error slot
//!
//! # Example
//!
//! ```
//! use nandgate_core::{Network, Signal};
//!
//! let mut network = Network::new();
//! let input = Signal::new(true);
//!
//! // A constant gate and an inverter reading it.
//! let constant = network.create(0).unwrap();
//! let inverter = network.create(1).unwrap();
//! network.connect_gate(constant, inverter, 0).unwrap();
//!
//! // A two-input gate reading the inverter and the signal.
//! let nand = network.create(2).unwrap();
//! network.connect_gate(inverter, nand, 0).unwrap();
//! network.connect_signal(&input, nand, 1).unwrap();
//!
//! let mut out = [false; 2];
//! let critical_path = network.evaluate(&[inverter, nand], &mut out).unwrap();
//! assert_eq!(out, [true, false]);
//! assert_eq!(critical_path, 2);
//! ```

pub mod error;
pub mod graph;
pub mod signal;

pub use error::{clear_last_error, last_error, ErrorKind, NetworkError};
pub use graph::{Consumers, Evaluation, Gate, GateId, Input, Mark, Network};
pub use signal::Signal;
