//! Property tests for the scheduled task registry.

use briar_core::{MessageId, TaskKind, TaskRegistry};
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = TaskKind> {
    let id = (0u8..4).prop_map(|n| MessageId::new(format!("m{n}")));
    prop_oneof![
        id.clone().prop_map(TaskKind::MarkDelivered),
        id.clone().prop_map(TaskKind::MarkRead),
        id.clone().prop_map(TaskKind::ExpireMedia),
        id.prop_map(TaskKind::ExpireEphemeral),
        (0u64..4).prop_map(TaskKind::ReplyTypingStart),
        (0u64..4).prop_map(TaskKind::DeliverReply),
        Just(TaskKind::AmbientTyping),
        Just(TaskKind::AmbientTypingStop),
    ]
}

proptest! {
    /// Due tasks come out in non-decreasing deadline order and nothing due
    /// is left behind.
    #[test]
    fn prop_take_due_is_ordered(
        tasks in prop::collection::vec((0u64..100, kind_strategy()), 0..40),
        now in 0u64..120,
    ) {
        let mut registry = TaskRegistry::new();
        for (deadline, kind) in &tasks {
            registry.schedule(*deadline, kind.clone());
        }

        let mut last = 0;
        while let Some((deadline, _)) = registry.pop_due(now) {
            prop_assert!(deadline >= last);
            prop_assert!(deadline <= now);
            last = deadline;
        }
        prop_assert!(registry.next_deadline().is_none_or(|d| d > now));
    }

    /// At most one pending task per key.
    #[test]
    fn prop_one_task_per_key(tasks in prop::collection::vec((0u64..100, kind_strategy()), 0..40)) {
        let mut registry = TaskRegistry::new();
        for (deadline, kind) in &tasks {
            registry.schedule(*deadline, kind.clone());
        }

        let distinct: std::collections::HashSet<_> = tasks.iter().map(|(_, k)| k).collect();
        prop_assert_eq!(registry.len(), distinct.len());
    }

    /// Cancelling a message's tasks leaves nothing targeting it.
    #[test]
    fn prop_cancel_for_message_is_complete(
        tasks in prop::collection::vec((0u64..100, kind_strategy()), 0..40),
        target in 0u8..4,
    ) {
        let mut registry = TaskRegistry::new();
        for (deadline, kind) in &tasks {
            registry.schedule(*deadline, kind.clone());
        }
        let target = MessageId::new(format!("m{target}"));

        let before = registry.len();
        let cancelled = registry.cancel_for_message(&target);
        prop_assert_eq!(registry.len(), before - cancelled);
        prop_assert!(registry.pending().all(|(_, k)| k.message_id() != Some(&target)));
    }
}
