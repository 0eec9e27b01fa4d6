//! Deterministic simulation harness for Briar.
//!
//! Virtual-time implementation of the Environment trait and a scripted
//! Driver for deterministic, reproducible testing of the conversation
//! simulator and the application runtime.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the
//! conversation invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    ConversationSnapshot, Invariant, InvariantKind, InvariantRegistry, InvariantResult,
    MessageSnapshot, NoResurrection, OneTimeMediaExpiry, ReactionUniqueness, StatusMonotonicity,
    Timeline, TornDownIsQuiescent, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError, Step};
pub use sim_env::{SimEnv, SimInstant};
