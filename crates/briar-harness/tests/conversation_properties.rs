//! Property-based tests for the conversation simulator.
//!
//! Tests verify that invariants hold under arbitrary operation sequences on
//! virtual time. This ensures behavioral correctness across all possible
//! interleavings of user operations and scheduled transitions.

use std::time::Duration;

use briar_core::{
    ContactId, Conversation, Media, MessageId, SimulationConfig, StaticDirectory, StaticSeed,
    env::Environment, seed::REACTION_EMOJIS,
};
use briar_harness::{InvariantRegistry, SimEnv, Timeline};
use proptest::prelude::*;

/// User operation or passage of time.
#[derive(Debug, Clone)]
enum Op {
    Send(String),
    SendImage,
    SendEphemeral(u64),
    Reveal(usize),
    React(usize, usize),
    Expire(usize),
    Advance(u64),
    Teardown,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[a-z ]{0,12}".prop_map(Op::Send),
        1 => Just(Op::SendImage),
        2 => (1u64..15_000).prop_map(Op::SendEphemeral),
        2 => (0usize..16).prop_map(Op::Reveal),
        2 => (0usize..16, 0usize..REACTION_EMOJIS.len()).prop_map(|(m, e)| Op::React(m, e)),
        1 => (0usize..16).prop_map(Op::Expire),
        6 => (0u64..12_000).prop_map(Op::Advance),
        1 => Just(Op::Teardown),
    ]
}

fn contact_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("1"), Just("2"), Just("3"), Just("zzz")]
}

fn open(env: &SimEnv, contact: &str, config: SimulationConfig) -> Conversation<SimEnv> {
    Conversation::open(
        ContactId::from(contact),
        &StaticDirectory,
        &StaticSeed,
        env.clone(),
        config,
        env.now(),
    )
}

/// Id of the message at `index` (modulo length), if any.
fn pick(conv: &Conversation<SimEnv>, index: usize) -> Option<MessageId> {
    let messages = conv.messages();
    if messages.is_empty() { None } else { Some(messages[index % messages.len()].id.clone()) }
}

fn apply(env: &SimEnv, conv: &mut Conversation<SimEnv>, op: &Op) {
    let now = env.now();
    match op {
        Op::Send(text) => {
            conv.send(text, None, now);
        },
        Op::SendImage => {
            conv.send("", Some(Media::image("blob:test")), now);
        },
        Op::SendEphemeral(ms) => {
            conv.send_ephemeral("psst", None, Duration::from_millis(*ms), now);
        },
        Op::Reveal(index) => {
            if let Some(id) = pick(conv, *index) {
                conv.reveal_once(&id, now);
            }
        },
        Op::React(index, emoji) => {
            if let Some(id) = pick(conv, *index) {
                conv.toggle_reaction(&id, REACTION_EMOJIS[*emoji]);
            }
        },
        Op::Expire(index) => {
            if let Some(id) = pick(conv, *index) {
                conv.expire_ephemeral(&id);
            }
        },
        Op::Advance(ms) => {
            let now = env.advance(Duration::from_millis(*ms));
            conv.handle_tick(now);
        },
        Op::Teardown => {
            conv.teardown();
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Conversation invariants hold under arbitrary operation sequences.
    #[test]
    fn prop_conversation_invariants_hold(
        seed in any::<u64>(),
        contact in contact_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let env = SimEnv::with_seed(seed);
        let mut conv = open(&env, contact, SimulationConfig::default());
        let invariants = InvariantRegistry::standard();
        let mut timeline = Timeline::new();
        timeline.record(&conv);

        for op in &ops {
            apply(&env, &mut conv, op);
            timeline.record(&conv);

            let result = invariants.check_all(&timeline);
            prop_assert!(result.is_ok(), "after {:?}: {:?}", op, result);
        }
    }

    /// Blank text without media never changes the conversation.
    #[test]
    fn prop_blank_send_is_noop(blank in "[ \t\n]{0,8}", seed in any::<u64>()) {
        let env = SimEnv::with_seed(seed);
        let mut conv = open(&env, "1", SimulationConfig::default());
        let before = conv.messages().to_vec();
        let pending = conv.tasks().len();

        prop_assert!(conv.send(&blank, None, env.now()).is_empty());
        prop_assert_eq!(conv.messages(), before.as_slice());
        prop_assert_eq!(conv.tasks().len(), pending);
    }

    /// Toggling the same reaction twice restores the original reactions.
    #[test]
    fn prop_double_toggle_restores(index in 0usize..6, emoji in 0usize..REACTION_EMOJIS.len()) {
        let env = SimEnv::new();
        let mut conv = open(&env, "1", SimulationConfig::quiet());
        let id = conv.messages()[index].id.clone();
        let before = conv.message(&id).and_then(|m| m.reactions.clone());

        conv.toggle_reaction(&id, REACTION_EMOJIS[emoji]);
        conv.toggle_reaction(&id, REACTION_EMOJIS[emoji]);
        prop_assert_eq!(conv.message(&id).and_then(|m| m.reactions.clone()), before);
    }

    /// A sent disappearing message is present just before its TTL and gone
    /// at it.
    #[test]
    fn prop_ephemeral_lives_exactly_ttl(ttl_ms in 2u64..120_000) {
        let env = SimEnv::new();
        let mut conv = open(&env, "3", SimulationConfig::quiet());
        conv.send_ephemeral("gone soon", None, Duration::from_millis(ttl_ms), env.now());
        let id = MessageId::local(1);

        conv.handle_tick(env.advance(Duration::from_millis(ttl_ms - 1)));
        prop_assert!(conv.message(&id).is_some());
        conv.handle_tick(env.advance(Duration::from_millis(1)));
        prop_assert!(conv.message(&id).is_none());
    }

    /// Revealed one-time media is replaced exactly when the grace period
    /// ends, whatever happens in between.
    #[test]
    fn prop_revealed_media_expires_after_grace(
        wait_ms in 0u64..10_000,
        reactions in prop::collection::vec(0usize..REACTION_EMOJIS.len(), 0..4),
    ) {
        let env = SimEnv::new();
        let config = SimulationConfig::quiet();
        let grace = config.one_time_view_grace;
        let mut conv = open(&env, "1", config);
        let m5 = MessageId::new("m5");

        conv.reveal_once(&m5, env.now());
        for emoji in reactions {
            conv.toggle_reaction(&m5, REACTION_EMOJIS[emoji]);
        }
        let now = env.advance(Duration::from_millis(wait_ms));
        conv.handle_tick(now);

        let expired = conv.message(&m5).is_some_and(|m| m.media.is_none());
        prop_assert_eq!(expired, Duration::from_millis(wait_ms) >= grace);
    }
}
