//! Real clock and OS randomness for the terminal client.
//!
//! Randomness decides whether the simulated contact replies, which canned
//! reply it sends, when an ambient typing burst starts and the `blob:`
//! locator of an attachment. With `SystemEnv` all of that differs from run to
//! run; simulation tests use the seeded `SimEnv` instead.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use briar_core::env::Environment;

/// Production environment: monotonic `Instant`, tokio sleep, getrandom.
///
/// # Panics
///
/// `random_bytes` panics if the OS RNG fails.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = Instant;

    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG failure is unrecoverable");
    }

    /// Message timestamps. A clock before the epoch reads as zero.
    #[allow(clippy::disallowed_methods)]
    fn wall_clock_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use briar_core::{DEFAULT_REPLIES, env::Deadline};

    use super::*;

    #[test]
    fn reply_odds_respect_policy_bounds() {
        let env = SystemEnv::new();

        assert!((0..100).all(|_| !env.chance(0.0)));
        assert!((0..100).all(|_| env.chance(1.0)));
        assert!((0..100).map(|_| env.random_unit()).all(|u| (0.0..1.0).contains(&u)));
    }

    #[test]
    fn canned_reply_index_stays_in_pool() {
        let env = SystemEnv::new();

        let pool = DEFAULT_REPLIES.len();
        assert!((0..200).filter_map(|_| env.choose_index(pool)).all(|i| i < pool));
        assert_eq!(env.choose_index(0), None);
    }

    #[test]
    fn attachment_locators_differ() {
        let env = SystemEnv::new();
        assert_ne!(env.random_u128(), env.random_u128());
    }

    #[test]
    fn far_deadline_is_rejected_not_panicking() {
        let env = SystemEnv::new();
        let now = env.now();

        assert!(now.checked_after(Duration::from_secs(1)).is_some_and(|d| d > now));
        assert_eq!(now.checked_after(Duration::MAX), None);
    }

    #[test]
    fn wall_clock_is_after_2020() {
        assert!(SystemEnv::new().wall_clock_millis() > 1_577_836_800_000);
    }

    #[tokio::test]
    async fn sleep_waits_on_real_time() {
        let env = SystemEnv::new();

        let start = env.now();
        env.sleep(Duration::from_millis(20)).await;

        assert!(env.now() - start >= Duration::from_millis(20));
    }
}
