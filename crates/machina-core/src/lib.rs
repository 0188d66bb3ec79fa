#![forbid(unsafe_code)]

//! Finite-state automaton diagram model + stepped simulation (headless).
//!
//! Design goals:
//! - deterministic, testable outputs (insertion-ordered containers throughout)
//! - strictly synchronous: every operation runs to completion, no executor
//! - no I/O of its own; storage and rendering are injected ports
//!
//! The drawable geometry of transitions lives in the sibling crate
//! `machina-render`; this crate owns the entities, the automaton walk, and
//! the persisted form.

pub mod config;
pub mod diagram;
pub mod error;
pub mod geom;
pub mod persist;
pub mod sim;

pub use config::DiagramConfig;
pub use diagram::{Diagram, EPSILON_LABEL, State, StateId, Symbol, Transition, TransitionId};
pub use error::{Error, Result};
pub use persist::{MemoryStore, PersistencePort, load_diagram, save_diagram};
pub use sim::{Adjacency, InputTapePort, Phase, Simulation, StepSnapshot};

#[cfg(test)]
mod tests;
