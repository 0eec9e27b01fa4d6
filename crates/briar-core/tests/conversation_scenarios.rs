//! Conversation lifecycle scenarios on virtual time.
//!
//! Each test opens a conversation against the static seed data with a
//! [`SimEnv`], drives it through user operations and ticks, and checks the
//! observable state the chat screen would show.

use std::time::Duration;

use briar_core::{
    ContactId, Conversation, ConversationAction, DeliveryStatus, MessageId, Notification, Sender,
    SimulationConfig, StaticDirectory, StaticSeed, TypingSource,
    conversation::{MEDIA_EXPIRED_DESCRIPTION, MEDIA_EXPIRED_TITLE},
    env::Environment,
    seed::HEART,
};
use briar_harness::SimEnv;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
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

/// Advance virtual time and tick.
fn advance(env: &SimEnv, conv: &mut Conversation<SimEnv>, by: Duration) -> Vec<ConversationAction> {
    let now = env.advance(by);
    conv.handle_tick(now)
}

#[test]
fn opening_alice_loads_six_messages() {
    let env = SimEnv::with_seed(1);
    let conv = open(&env, "1", SimulationConfig::default());

    assert_eq!(conv.profile().map(|p| p.display_name.as_str()), Some("Alice"));
    assert_eq!(conv.messages().len(), 6);

    let last = conv.messages().last().cloned();
    assert_eq!(last.as_ref().map(|m| m.sender), Some(Sender::Me));
    assert_eq!(last.map(|m| m.status), Some(DeliveryStatus::Delivered));
    assert!(!conv.is_typing());
}

#[test]
fn unknown_contact_shows_not_found() {
    let env = SimEnv::new();
    let mut conv = open(&env, "zzz", SimulationConfig::default());

    assert!(conv.is_not_found());
    assert!(conv.messages().is_empty());
    assert!(advance(&env, &mut conv, secs(60)).is_empty());
}

#[test]
fn sent_message_walks_through_statuses() {
    let env = SimEnv::with_seed(3);
    let mut conv = open(&env, "1", SimulationConfig::default());

    conv.send("hello", None, env.now());
    assert_eq!(conv.messages().len(), 7);
    let id = MessageId::local(1);
    let status = |conv: &Conversation<SimEnv>| conv.message(&id).map(|m| m.status);

    assert_eq!(conv.messages()[6].content, "hello");
    assert_eq!(status(&conv), Some(DeliveryStatus::Sent));

    advance(&env, &mut conv, Duration::from_millis(999));
    assert_eq!(status(&conv), Some(DeliveryStatus::Sent));
    advance(&env, &mut conv, Duration::from_millis(1));
    assert_eq!(status(&conv), Some(DeliveryStatus::Delivered));
    advance(&env, &mut conv, secs(2));
    assert_eq!(status(&conv), Some(DeliveryStatus::Read));
}

#[test]
fn toggling_heart_on_m4_clears_reactions() {
    let env = SimEnv::new();
    let mut conv = open(&env, "1", SimulationConfig::default());
    let m4 = MessageId::new("m4");

    assert_eq!(conv.message(&m4).map(|m| m.reactions().len()), Some(1));
    assert_eq!(conv.toggle_reaction(&m4, HEART), vec![ConversationAction::Render]);
    assert_eq!(conv.message(&m4).and_then(|m| m.reactions.clone()), None);

    conv.toggle_reaction(&m4, HEART);
    assert_eq!(conv.message(&m4).map(|m| m.reactions().len()), Some(1));
}

#[test]
fn certain_reply_types_then_arrives() {
    let env = SimEnv::with_seed(9);
    let config = SimulationConfig { reply_probability: 1.0, ..SimulationConfig::quiet() };
    let mut conv = open(&env, "2", config.clone());
    conv.send("anyone there?", None, env.now());

    advance(&env, &mut conv, secs(2));
    assert_eq!(conv.typing_sources().collect::<Vec<_>>(), vec![TypingSource::Reply(1)]);

    let actions = advance(&env, &mut conv, secs(2));
    assert_eq!(actions, vec![ConversationAction::Render]);
    assert!(!conv.is_typing());

    let reply = conv.messages().last().cloned();
    assert_eq!(reply.as_ref().map(|m| m.id.clone()), Some(MessageId::reply(1)));
    assert_eq!(reply.as_ref().map(|m| m.status), Some(DeliveryStatus::Delivered));
    assert!(reply.is_some_and(|m| config.reply_pool.contains(&m.content)));
}

#[test]
fn overlapping_replies_keep_indicator_until_last() {
    let env = SimEnv::with_seed(4);
    let config = SimulationConfig { reply_probability: 1.0, ..SimulationConfig::quiet() };
    let mut conv = open(&env, "3", config);

    conv.send("one", None, env.now());
    advance(&env, &mut conv, secs(1));
    conv.send("two", None, env.now());

    // First reply delivered at 4s, second still typing until 5s
    advance(&env, &mut conv, secs(3));
    assert!(conv.is_typing());
    advance(&env, &mut conv, secs(1));
    assert!(!conv.is_typing());
    assert_eq!(conv.messages().iter().filter(|m| m.sender == Sender::Peer).count(), 3);
}

#[test]
fn revealed_media_expires_with_notification() {
    let env = SimEnv::new();
    let mut conv = open(&env, "1", SimulationConfig::quiet());
    let m5 = MessageId::new("m5");

    conv.reveal_once(&m5, env.now());
    advance(&env, &mut conv, secs(4));
    assert!(conv.message(&m5).and_then(|m| m.media.as_ref()).is_some());

    let actions = advance(&env, &mut conv, secs(1));
    assert_eq!(actions, vec![
        ConversationAction::Notify(Notification::info(MEDIA_EXPIRED_TITLE, MEDIA_EXPIRED_DESCRIPTION)),
        ConversationAction::Render,
    ]);
    assert_eq!(conv.message(&m5).map(|m| m.content.as_str()), Some("This media has expired"));
}

#[test]
fn seeded_disappearing_message_leaves_after_thirty_seconds() {
    let env = SimEnv::new();
    let mut conv = open(&env, "1", SimulationConfig::quiet());

    advance(&env, &mut conv, secs(29));
    assert!(conv.message(&MessageId::new("m3")).is_some());
    advance(&env, &mut conv, secs(1));
    assert!(conv.message(&MessageId::new("m3")).is_none());
}

#[test]
fn ambient_typing_follows_seeded_rng() {
    let config = SimulationConfig { ambient_typing_probability: 0.5, ..SimulationConfig::quiet() };

    let run = |seed: u64| {
        let env = SimEnv::with_seed(seed);
        let mut conv = open(&env, "3", config.clone());
        (0..20)
            .map(|_| {
                advance(&env, &mut conv, secs(10));
                conv.is_typing()
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(11), run(11));
}

#[test]
fn teardown_freezes_conversation() {
    let env = SimEnv::with_seed(5);
    let mut conv = open(&env, "1", SimulationConfig::default());
    conv.send("bye", None, env.now());
    conv.reveal_once(&MessageId::new("m5"), env.now());

    let before = conv.messages().to_vec();
    assert!(conv.teardown() > 0);
    assert!(advance(&env, &mut conv, secs(120)).is_empty());
    assert_eq!(conv.messages(), before.as_slice());
    assert!(conv.send("still here?", None, env.now()).is_empty());
}
