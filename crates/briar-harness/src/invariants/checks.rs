//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use briar_core::MessageId;

use super::{Invariant, InvariantKind, InvariantResult, Timeline, Violation};

/// Delivery status must never decrease.
///
/// For every message present in two consecutive snapshots, the later status
/// is at least the earlier one. A late scheduled transition must not move a
/// message from read back to delivered.
pub struct StatusMonotonicity;

impl Invariant for StatusMonotonicity {
    fn kind(&self) -> InvariantKind {
        InvariantKind::StatusMonotonicity
    }

    fn check(&self, timeline: &Timeline) -> InvariantResult {
        for (step, (before, after)) in timeline.steps().enumerate() {
            for message in &after.messages {
                if let Some(previous) = before.message(&message.id)
                    && message.status < previous.status
                {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!(
                            "step {step}: message {} went {:?} → {:?}",
                            message.id, previous.status, message.status
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A message that disappeared must never reappear.
///
/// Ephemeral expiry is final; a stale task firing after removal must not
/// bring the message back.
pub struct NoResurrection;

impl Invariant for NoResurrection {
    fn kind(&self) -> InvariantKind {
        InvariantKind::NoResurrection
    }

    fn check(&self, timeline: &Timeline) -> InvariantResult {
        let mut removed: HashSet<&MessageId> = HashSet::new();

        for (step, (before, after)) in timeline.steps().enumerate() {
            if let Some(back) = after.messages.iter().find(|m| removed.contains(&m.id)) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("step {step}: removed message {} reappeared", back.id),
                });
            }
            removed.extend(
                before.messages.iter().filter(|m| after.message(&m.id).is_none()).map(|m| &m.id),
            );
        }
        Ok(())
    }
}

/// Reactions are unique per (emoji, reactor), and never stored as an empty
/// list.
pub struct ReactionUniqueness;

impl Invariant for ReactionUniqueness {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ReactionUniqueness
    }

    fn check(&self, timeline: &Timeline) -> InvariantResult {
        for (index, snapshot) in timeline.snapshots().iter().enumerate() {
            for message in &snapshot.messages {
                let Some(reactions) = &message.reactions else {
                    continue;
                };
                if reactions.is_empty() {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!("snapshot {index}: message {} has an empty reaction list", message.id),
                    });
                }
                let mut seen = HashSet::new();
                if let Some(duplicate) = reactions.iter().find(|r| !seen.insert(*r)) {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!(
                            "snapshot {index}: message {} has duplicate reaction {:?}",
                            message.id, duplicate
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Revealed one-time media stays revealed until it expires, and expiry
/// replaces it with the marker text.
///
/// Unrevealed media never vanishes on its own.
pub struct OneTimeMediaExpiry;

impl Invariant for OneTimeMediaExpiry {
    fn kind(&self) -> InvariantKind {
        InvariantKind::OneTimeMediaExpiry
    }

    fn check(&self, timeline: &Timeline) -> InvariantResult {
        for (step, (before, after)) in timeline.steps().enumerate() {
            for previous in &before.messages {
                let (Some(viewed), Some(current)) = (previous.one_time_view, after.message(&previous.id))
                else {
                    continue;
                };

                let violation = match (viewed, current.one_time_view) {
                    (true, Some(false)) => Some("revealed media became unrevealed"),
                    (false, None) => Some("unrevealed media vanished"),
                    (true, None) if current.has_media || current.content != after.expired_marker => {
                        Some("expired media not replaced by marker")
                    },
                    _ => None,
                };

                if let Some(what) = violation {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!("step {step}: message {}: {what}", previous.id),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A torn-down conversation has nothing pending, shows no typing indicator
/// and never changes again.
pub struct TornDownIsQuiescent;

impl Invariant for TornDownIsQuiescent {
    fn kind(&self) -> InvariantKind {
        InvariantKind::TornDownIsQuiescent
    }

    fn check(&self, timeline: &Timeline) -> InvariantResult {
        for (index, snapshot) in timeline.snapshots().iter().enumerate() {
            if snapshot.torn_down && (snapshot.pending_tasks > 0 || snapshot.typing) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "snapshot {index}: torn down with {} pending tasks, typing={}",
                        snapshot.pending_tasks, snapshot.typing
                    ),
                });
            }
        }

        for (step, (before, after)) in timeline.steps().enumerate() {
            if before.torn_down && (!after.torn_down || after.messages != before.messages) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("step {step}: torn-down conversation changed"),
                });
            }
        }
        Ok(())
    }
}
