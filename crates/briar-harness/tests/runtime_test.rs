//! End-to-end tests of the generic runtime on the simulation driver.
//!
//! # Test Strategy
//!
//! Each test scripts what a user types (and how long they pause), runs the
//! same [`Runtime`] the terminal uses on virtual time, and then checks what
//! the user would have seen: screens, notifications and navigations.
//! Conversation invariants are checked on every render.

use std::time::Duration;

use briar_app::Runtime;
use briar_core::{DeliveryStatus, MessageId, Severity, SimulationConfig, seed::HEART};
use briar_harness::{InvariantRegistry, SimDriver, SimEnv, Step};

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

/// Run `script` to completion with invariants checked on every render.
async fn run(
    seed: u64,
    config: SimulationConfig,
    script: Vec<Step>,
    files: Vec<Vec<u8>>,
) -> Runtime<SimDriver, SimEnv> {
    let env = SimEnv::with_seed(seed);
    let driver = SimDriver::new(env.clone(), script)
        .with_files(files)
        .with_invariants(InvariantRegistry::standard());
    let mut runtime = Runtime::new(driver, env, config);
    runtime.run().await.expect("runtime should finish without invariant violations");
    runtime
}

fn titles(driver: &SimDriver) -> Vec<&str> {
    driver.notifications().iter().map(|n| n.title.as_str()).collect()
}

#[tokio::test]
async fn full_session_on_virtual_time() {
    let script = vec![
        Step::typed("/open 1"),
        Step::typed("/login alice secret"),
        Step::typed("/open 1"),
        Step::typed("hello"),
        Step::wait(secs(3)),
        Step::typed("/view m5"),
        Step::wait(secs(5)),
        Step::typed(&format!("/react m4 {HEART}")),
        Step::typed("/vanish 2 psst"),
        Step::wait(secs(2)),
        Step::typed("/attach cat.png"),
        Step::typed("/close"),
    ];
    let runtime = run(1, SimulationConfig::quiet(), script, vec![vec![0xff; 16]]).await;
    let driver = runtime.driver();

    assert!(driver.is_stopped());
    assert_eq!(driver.navigations(), ["/login", "/chats", "/chats/1", "/chats"]);
    assert_eq!(driver.file_requests(), ["cat.png"]);

    let titles = titles(driver);
    assert_eq!(titles, ["Authentication required", "Success", "Media expired"]);
    assert_eq!(driver.notifications()[0].severity, Severity::Destructive);

    // Last state of Alice's conversation before it was closed
    let last = driver.timeline().latest().expect("conversation was rendered");
    assert_eq!(last.message(&MessageId::local(1)).map(|m| m.status), Some(DeliveryStatus::Read));
    assert_eq!(last.message(&MessageId::new("m5")).map(|m| m.content.as_str()), Some("This media has expired"));
    assert_eq!(last.message(&MessageId::new("m4")).and_then(|m| m.reactions.clone()), None);
    assert!(last.message(&MessageId::local(2)).is_none());
    assert!(last.message(&MessageId::local(3)).is_some_and(|m| m.has_media));

    assert!(runtime.app().conversation().is_none());
}

#[tokio::test]
async fn same_seed_renders_same_screens() {
    let script = || {
        vec![
            Step::typed("/login bob pw"),
            Step::typed("/open 2"),
            Step::typed("are you there?"),
            Step::wait(secs(10)),
            Step::typed("hello?"),
            Step::wait(secs(30)),
        ]
    };

    let first = run(42, SimulationConfig::default(), script(), vec![]).await;
    let second = run(42, SimulationConfig::default(), script(), vec![]).await;

    assert_eq!(first.driver().screens(), second.driver().screens());
    assert!(!first.driver().screens().is_empty());
}

#[tokio::test]
async fn disabled_notifications_hide_media_expiry() {
    let script = vec![
        Step::typed("/login carol pw"),
        Step::typed("/notifications"),
        Step::typed("/open 1"),
        Step::typed("/view m5"),
        Step::wait(secs(6)),
    ];
    let runtime = run(7, SimulationConfig::quiet(), script, vec![]).await;

    let titles = titles(runtime.driver());
    assert!(!titles.contains(&"Media expired"));
    assert_eq!(titles.len(), 2);

    let last = runtime.driver().timeline().latest().expect("conversation was rendered");
    assert!(last.message(&MessageId::new("m5")).is_some_and(|m| !m.has_media));
}

#[tokio::test]
async fn logout_requires_login_again() {
    let script = vec![
        Step::typed("/login dave pw"),
        Step::typed("/open 3"),
        Step::typed("/logout"),
        Step::typed("/open 3"),
    ];
    let runtime = run(3, SimulationConfig::quiet(), script, vec![]).await;
    let driver = runtime.driver();

    assert_eq!(driver.navigations(), ["/chats", "/chats/3", "/login", "/login"]);
    assert_eq!(titles(driver).last(), Some(&"Authentication required"));
    assert!(runtime.app().session().is_none());
}

#[tokio::test]
async fn unknown_contact_renders_not_found() {
    let script = vec![Step::typed("/login erin pw"), Step::typed("/open zzz"), Step::typed("hello")];
    let runtime = run(0, SimulationConfig::default(), script, vec![]).await;

    let screen = runtime.driver().last_screen().expect("screen rendered");
    assert_eq!(screen.first().map(String::as_str), Some("Conversation not found"));
    assert!(runtime.driver().timeline().latest().is_some_and(|s| s.messages.is_empty()));
}
