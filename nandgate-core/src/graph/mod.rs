//! Gate Network
//!
//! This module implements the network of NAND gates and its evaluator.
//!
//! # Overview
//!
//! The network is a directed graph where:
//!
//! - Nodes are gates with a fixed number of input slots
//! - Edges run from a producer gate to each consumer slot that reads it
//!
//! A slot may also read an external [`Signal`](crate::Signal) or be left
//! unconnected. Evaluation walks backward from a set of observed gates,
//! computing their outputs and the critical path length in a single pass.
//!
//! # Design Decisions
//!
//! 1. Gates live in a central arena keyed by [`GateId`] rather than pointing
//!    at each other, so deleting a gate can never leave a dangling slot.
//!
//! 2. We maintain both forward (inputs) and reverse (consumers) edges, so
//!    deletion can find and clear every slot that reads the deleted gate.
//!
//! 3. Evaluation state lives on the gates themselves and is reset after
//!    every call, keeping the arena the only source of truth.

mod consumers;
mod evaluate;
mod gate;
mod network;

pub use consumers::Consumers;
pub use evaluate::Evaluation;
pub use gate::{Gate, GateId, Input, Mark};
pub use network::Network;
