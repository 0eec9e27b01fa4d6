//! Registry of pending scheduled transitions for one conversation.
//!
//! Every timer the simulator would otherwise fire-and-forget is recorded here
//! as a [`TaskKind`] with a deadline. The conversation drains due tasks on
//! each tick and cancels the whole registry on teardown, so nothing can mutate
//! a conversation that is no longer open.
//!
//! At most one task per key is pending: scheduling a key that is already
//! pending moves its deadline. Tasks with equal deadlines come out in the
//! order they were scheduled.

use std::collections::{BTreeMap, HashMap};

use crate::MessageId;

/// What a scheduled task does when it fires. Doubles as the task key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Advance an outgoing message to delivered.
    MarkDelivered(MessageId),
    /// Advance an outgoing message to read.
    MarkRead(MessageId),
    /// Show the typing indicator for a pending reply.
    ReplyTypingStart(u64),
    /// Append a pending reply and clear its typing indicator.
    DeliverReply(u64),
    /// Strip a revealed one-time-view attachment.
    ExpireMedia(MessageId),
    /// Remove an ephemeral message.
    ExpireEphemeral(MessageId),
    /// Ambient typing tick; reschedules itself.
    AmbientTyping,
    /// End of an ambient typing burst.
    AmbientTypingStop,
}

impl TaskKind {
    /// Message this task targets, if any.
    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            Self::MarkDelivered(id)
            | Self::MarkRead(id)
            | Self::ExpireMedia(id)
            | Self::ExpireEphemeral(id) => Some(id),
            Self::ReplyTypingStart(_)
            | Self::DeliverReply(_)
            | Self::AmbientTyping
            | Self::AmbientTypingStop => None,
        }
    }
}

/// Pending tasks ordered by deadline.
///
/// Generic over the instant type so simulation can use virtual time.
#[derive(Debug, Clone)]
pub struct TaskRegistry<I> {
    /// (deadline, sequence) → task
    queue: BTreeMap<(I, u64), TaskKind>,
    /// task → (deadline, sequence) (reverse index for cancellation)
    index: HashMap<TaskKind, (I, u64)>,
    /// Scheduling counter, breaks deadline ties in FIFO order
    next_seq: u64,
}

impl<I: Copy + Ord> Default for TaskRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Copy + Ord> TaskRegistry<I> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { queue: BTreeMap::new(), index: HashMap::new(), next_seq: 0 }
    }

    /// Schedule `kind` at `deadline`.
    ///
    /// Replaces any pending task with the same key. Returns `true` if a
    /// pending task was replaced.
    pub fn schedule(&mut self, deadline: I, kind: TaskKind) -> bool {
        let replaced = self.cancel(&kind);
        let key = (deadline, self.next_seq);
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.insert(key, kind.clone());
        self.index.insert(kind, key);
        replaced
    }

    /// Cancel a pending task. Returns `true` if it was pending.
    pub fn cancel(&mut self, kind: &TaskKind) -> bool {
        match self.index.remove(kind) {
            Some(key) => {
                self.queue.remove(&key);
                true
            },
            None => false,
        }
    }

    /// Cancel every task that targets `id`. Returns how many were cancelled.
    pub fn cancel_for_message(&mut self, id: &MessageId) -> usize {
        let doomed: Vec<TaskKind> =
            self.index.keys().filter(|k| k.message_id() == Some(id)).cloned().collect();
        for kind in &doomed {
            self.cancel(kind);
        }
        doomed.len()
    }

    /// Cancel everything. Returns how many tasks were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.queue.len();
        self.queue.clear();
        self.index.clear();
        count
    }

    /// Remove and return the earliest task if it is due at or before `now`,
    /// together with its deadline.
    ///
    /// Tasks scheduled while draining are picked up by later calls, so a
    /// caller looping on this sees chained transitions that fall due within
    /// the same window.
    pub fn pop_due(&mut self, now: I) -> Option<(I, TaskKind)> {
        let entry = self.queue.first_entry()?;
        let deadline = entry.key().0;
        if deadline > now {
            return None;
        }
        let kind = entry.remove();
        self.index.remove(&kind);
        Some((deadline, kind))
    }

    /// Remove and return every task due at or before `now`, in deadline
    /// order.
    pub fn take_due(&mut self, now: I) -> Vec<TaskKind> {
        let mut due = Vec::new();
        while let Some((_, kind)) = self.pop_due(now) {
            due.push(kind);
        }
        due
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<I> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Deadline of a pending task.
    pub fn deadline_of(&self, kind: &TaskKind) -> Option<I> {
        self.index.get(kind).map(|(deadline, _)| *deadline)
    }

    /// Whether `kind` is pending.
    pub fn contains(&self, kind: &TaskKind) -> bool {
        self.index.contains_key(kind)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// No pending tasks.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending tasks in deadline order.
    pub fn pending(&self) -> impl Iterator<Item = (I, &TaskKind)> {
        self.queue.iter().map(|((deadline, _), kind)| (*deadline, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> MessageId {
        MessageId::new(s)
    }

    #[test]
    fn due_tasks_come_out_in_deadline_order() {
        let mut reg = TaskRegistry::new();
        reg.schedule(30u64, TaskKind::MarkRead(id("a")));
        reg.schedule(10, TaskKind::MarkDelivered(id("a")));
        reg.schedule(20, TaskKind::AmbientTyping);

        assert_eq!(reg.next_deadline(), Some(10));
        assert_eq!(reg.take_due(25), vec![
            TaskKind::MarkDelivered(id("a")),
            TaskKind::AmbientTyping
        ]);
        assert_eq!(reg.len(), 1);
        assert!(reg.take_due(29).is_empty());
        assert_eq!(reg.take_due(30), vec![TaskKind::MarkRead(id("a"))]);
        assert!(reg.is_empty());
    }

    #[test]
    fn ties_resolve_in_scheduling_order() {
        let mut reg = TaskRegistry::new();
        reg.schedule(5u64, TaskKind::ExpireEphemeral(id("b")));
        reg.schedule(5, TaskKind::ExpireEphemeral(id("a")));

        assert_eq!(reg.take_due(5), vec![
            TaskKind::ExpireEphemeral(id("b")),
            TaskKind::ExpireEphemeral(id("a"))
        ]);
    }

    #[test]
    fn rescheduling_replaces_deadline() {
        let mut reg = TaskRegistry::new();
        assert!(!reg.schedule(5u64, TaskKind::AmbientTypingStop));
        assert!(reg.schedule(9, TaskKind::AmbientTypingStop));

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.deadline_of(&TaskKind::AmbientTypingStop), Some(9));
        assert!(reg.take_due(8).is_empty());
    }

    #[test]
    fn cancel_for_message_leaves_other_tasks() {
        let mut reg = TaskRegistry::new();
        reg.schedule(1u64, TaskKind::MarkDelivered(id("a")));
        reg.schedule(3, TaskKind::MarkRead(id("a")));
        reg.schedule(2, TaskKind::MarkDelivered(id("b")));
        reg.schedule(4, TaskKind::DeliverReply(1));

        assert_eq!(reg.cancel_for_message(&id("a")), 2);
        assert!(reg.contains(&TaskKind::MarkDelivered(id("b"))));
        assert!(reg.contains(&TaskKind::DeliverReply(1)));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn cancel_all_drains_registry() {
        let mut reg = TaskRegistry::new();
        reg.schedule(1u64, TaskKind::AmbientTyping);
        reg.schedule(2, TaskKind::ReplyTypingStart(0));

        assert_eq!(reg.cancel_all(), 2);
        assert!(reg.is_empty());
        assert!(reg.take_due(u64::MAX).is_empty());
        assert_eq!(reg.next_deadline(), None);
    }

    #[test]
    fn pop_due_reports_deadline() {
        let mut reg = TaskRegistry::new();
        reg.schedule(7u64, TaskKind::ExpireMedia(id("m5")));

        assert_eq!(reg.pop_due(6), None);
        assert_eq!(reg.pop_due(100), Some((7, TaskKind::ExpireMedia(id("m5")))));
        assert_eq!(reg.pop_due(100), None);
    }

    #[test]
    fn cancel_missing_task_is_false() {
        let mut reg: TaskRegistry<u64> = TaskRegistry::new();
        assert!(!reg.cancel(&TaskKind::AmbientTyping));
    }
}
