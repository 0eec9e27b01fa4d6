//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during a conversation's
//! lifetime. Unlike example-based tests that check specific scenarios,
//! invariants verify behavioral properties across all possible execution
//! paths.
//!
//! # Architecture
//!
//! Tests record a [`ConversationSnapshot`] after every step into a
//! [`Timeline`], then run the registered [`Invariant`] checks against the
//! whole history. Several invariants (status monotonicity, no resurrection)
//! are only observable across snapshots.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let mut timeline = Timeline::new();
//! timeline.record(&conversation);
//! registry.check_all(&timeline)?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{
    NoResurrection, OneTimeMediaExpiry, ReactionUniqueness, StatusMonotonicity,
    TornDownIsQuiescent,
};
pub use snapshot::{ConversationSnapshot, MessageSnapshot, Timeline};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies an invariant in violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// Delivery status never moves backwards.
    StatusMonotonicity,
    /// A removed message never comes back.
    NoResurrection,
    /// Reactions are unique per (emoji, reactor) and never an empty list.
    ReactionUniqueness,
    /// Revealed one-time media stays revealed until replaced by the marker.
    OneTimeMediaExpiry,
    /// A torn-down conversation has no pending work and never changes.
    TornDownIsQuiescent,
}

impl InvariantKind {
    /// Name for error reporting.
    pub fn name(self) -> &'static str {
        match self {
            Self::StatusMonotonicity => "status_monotonicity",
            Self::NoResurrection => "no_resurrection",
            Self::ReactionUniqueness => "reaction_uniqueness",
            Self::OneTimeMediaExpiry => "one_time_media_expiry",
            Self::TornDownIsQuiescent => "torn_down_is_quiescent",
        }
    }
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Which invariant was violated.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against a recorded timeline.
///
/// Invariants are behavioral properties that must always hold.
/// They capture WHAT must be true, not specific test scenarios.
pub trait Invariant: Send + Sync {
    /// Which invariant this is.
    fn kind(&self) -> InvariantKind;

    /// Check the invariant against the recorded history.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, timeline: &Timeline) -> InvariantResult;
}

/// Registry of invariants to check.
///
/// Collects multiple invariants and runs them all against a timeline.
/// Use [`InvariantRegistry::standard()`] for the conversation invariants.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with every conversation invariant.
    ///
    /// Includes:
    /// - [`StatusMonotonicity`]: statuses never decrease
    /// - [`NoResurrection`]: removed messages stay removed
    /// - [`ReactionUniqueness`]: no duplicate reactions, no empty list
    /// - [`OneTimeMediaExpiry`]: revealed media only leaves via the marker
    /// - [`TornDownIsQuiescent`]: nothing pending or changing after teardown
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(StatusMonotonicity);
        registry.add(NoResurrection);
        registry.add(ReactionUniqueness);
        registry.add(OneTimeMediaExpiry);
        registry.add(TornDownIsQuiescent);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given timeline.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, timeline: &Timeline) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(timeline).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking on violation.
    ///
    /// Use this in tests where you want immediate failure with context.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, timeline: &Timeline, context: &str) {
        if let Err(violations) = self.check_all(timeline) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_invariants() {
        let registry = InvariantRegistry::standard();
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn empty_timeline_passes_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(registry.check_all(&Timeline::new()).is_ok());
    }
}
