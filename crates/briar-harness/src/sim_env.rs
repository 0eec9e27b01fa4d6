//! Simulation environment with virtual time and seeded randomness.
//!
//! `SimEnv` implements [`Environment`] for deterministic tests. Time only
//! moves when a test advances it (or something sleeps), and every random
//! draw comes from a ChaCha stream seeded by the test, so a seed fully
//! determines which replies are sent and when the contact "types".
//!
//! Clones share the same clock and RNG.

use std::{
    fmt,
    ops::{Add, Sub},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use briar_core::env::{Deadline, Environment};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Wall clock at virtual time zero (2023-11-14T22:13:20Z).
pub const DEFAULT_WALL_CLOCK_MS: u64 = 1_700_000_000_000;

/// Point on the virtual timeline, measured from simulation start.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// Simulation start.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Time elapsed since simulation start.
    pub fn elapsed(self) -> Duration {
        self.0
    }
}

impl fmt::Debug for SimInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T+{}ms", self.0.as_millis())
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(rhs))
    }
}

impl Deadline for SimInstant {
    fn checked_after(self, after: Duration) -> Option<Self> {
        self.0.checked_add(after).map(Self)
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

struct SimState {
    now: SimInstant,
    rng: ChaCha8Rng,
    wall_base_ms: u64,
}

/// Deterministic environment for simulation tests.
#[derive(Clone)]
pub struct SimEnv {
    state: Arc<Mutex<SimState>>,
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SimEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimEnv").field("now", &self.lock().now).finish_non_exhaustive()
    }
}

impl SimEnv {
    /// Environment seeded with 0.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Environment whose RNG stream is determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                now: SimInstant::ZERO,
                rng: ChaCha8Rng::seed_from_u64(seed),
                wall_base_ms: DEFAULT_WALL_CLOCK_MS,
            })),
        }
    }

    /// Move virtual time forward.
    pub fn advance(&self, duration: Duration) -> SimInstant {
        let mut state = self.lock();
        state.now = state.now + duration;
        state.now
    }

    /// Move virtual time forward to `instant`. Earlier instants are ignored.
    pub fn advance_to(&self, instant: SimInstant) -> SimInstant {
        let mut state = self.lock();
        state.now = state.now.max(instant);
        state.now
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        self.lock().now
    }

    /// Completes immediately after advancing virtual time.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        self.advance(duration);
        std::future::ready(())
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.lock().rng.fill_bytes(buffer);
    }

    fn wall_clock_millis(&self) -> u64 {
        let state = self.lock();
        let elapsed = u64::try_from(state.now.elapsed().as_millis()).unwrap_or(u64::MAX);
        state.wall_base_ms.saturating_add(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_only_moves_when_advanced() {
        let env = SimEnv::new();
        assert_eq!(env.now(), SimInstant::ZERO);

        env.advance(Duration::from_secs(3));
        assert_eq!(env.now() - SimInstant::ZERO, Duration::from_secs(3));
        assert_eq!(env.wall_clock_millis(), DEFAULT_WALL_CLOCK_MS + 3000);
    }

    #[test]
    fn clones_share_clock() {
        let env = SimEnv::new();
        let other = env.clone();
        other.advance(Duration::from_millis(10));
        assert_eq!(env.now(), other.now());
    }

    #[test]
    fn same_seed_same_stream() {
        let a = SimEnv::with_seed(7);
        let b = SimEnv::with_seed(7);
        let c = SimEnv::with_seed(8);

        let draws_a: Vec<u64> = (0..4).map(|_| a.random_u64()).collect();
        let draws_b: Vec<u64> = (0..4).map(|_| b.random_u64()).collect();
        let draws_c: Vec<u64> = (0..4).map(|_| c.random_u64()).collect();
        assert_eq!(draws_a, draws_b);
        assert_ne!(draws_a, draws_c);
    }

    #[test]
    fn checked_deadline_reports_overflow() {
        let t = SimInstant::ZERO + Duration::from_secs(1);
        assert_eq!(t.checked_after(Duration::from_secs(2)), Some(SimInstant::ZERO + Duration::from_secs(3)));
        assert_eq!(t.checked_after(Duration::MAX), None);
    }

    #[test]
    fn advance_to_never_goes_back() {
        let env = SimEnv::new();
        env.advance(Duration::from_secs(5));
        env.advance_to(SimInstant::ZERO + Duration::from_secs(1));
        assert_eq!(env.now().elapsed(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn sleep_advances_virtual_time() {
        let env = SimEnv::new();
        env.sleep(Duration::from_secs(2)).await;
        assert_eq!(env.now().elapsed(), Duration::from_secs(2));
    }
}
