//! Property-based tests for the App state machine.
//!
//! Tests verify that session and conversation rules hold under arbitrary
//! command sequences interleaved with the passage of virtual time.

use std::time::Duration;

use briar_app::{App, AppAction, AppEvent};
use briar_core::{SimulationConfig, env::Environment};
use briar_harness::SimEnv;
use proptest::prelude::*;

/// Generate typed input lines, valid and invalid.
fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => Just("/login alice pw".to_string()),
        1 => Just("/login".to_string()),
        1 => Just("/logout".to_string()),
        2 => prop::sample::select(vec!["1", "2", "3", "zzz"]).prop_map(|c| format!("/open {c}")),
        1 => Just("/close".to_string()),
        1 => Just("/view m5".to_string()),
        1 => Just("/react m4 \u{1f44d}".to_string()),
        1 => (1u64..20).prop_map(|s| format!("/vanish {s} gone")),
        1 => Just("/notifications".to_string()),
        1 => Just("/chats".to_string()),
        1 => Just("/start u2".to_string()),
        1 => Just("/attach".to_string()),
        3 => "[a-z ]{0,10}",
        1 => "/[a-z]{1,6}",
    ]
}

/// Generate events: typed lines and ticks after a pause.
fn event_strategy() -> impl Strategy<Value = (u64, Option<String>)> {
    prop_oneof![
        3 => line_strategy().prop_map(|l| (0, Some(l))),
        2 => (0u64..8_000).prop_map(|ms| (ms, None)),
    ]
}

proptest! {
    /// A conversation is only ever open while signed in, and nothing
    /// happens to the screen without a session.
    #[test]
    fn prop_conversation_requires_session(
        seed in any::<u64>(),
        events in prop::collection::vec(event_strategy(), 0..60),
    ) {
        let env = SimEnv::with_seed(seed);
        let mut app = App::new(env.clone(), SimulationConfig::default());

        for (pause, line) in events {
            let now = env.advance(Duration::from_millis(pause));
            let event = line.as_deref().map_or(AppEvent::Tick, AppEvent::from_line);
            let actions = app.handle(event, now);

            prop_assert!(app.conversation().is_none() || app.session().is_some());
            prop_assert!(!actions.contains(&AppAction::Quit));
            if app.session().is_none() {
                let picked = actions.iter().any(|a| matches!(a, AppAction::PickFile { .. }));
                prop_assert!(!picked, "file picker requested while signed out");
            }
        }
    }

    /// Notification toggling is an involution.
    #[test]
    fn prop_notification_toggle_parity(toggles in 0usize..10) {
        let env = SimEnv::new();
        let mut app = App::new(env.clone(), SimulationConfig::quiet());
        for _ in 0..toggles {
            app.handle(AppEvent::from_line("/notifications"), env.now());
        }
        prop_assert_eq!(app.preferences().notifications_enabled, toggles % 2 == 0);
    }
}
