//! Environment abstraction for deterministic testing.
//!
//! Decouples the conversation simulator from system resources (time,
//! randomness). Enables deterministic simulation with a virtual clock and a
//! seeded RNG, and production use with real system resources.

use std::time::Duration;

/// Instant arithmetic that cannot panic.
///
/// `std::time::Instant + Duration` panics when the result is out of range;
/// deadlines built from user input go through this instead.
pub trait Deadline: Sized {
    /// `self + after`, or `None` if that instant is not representable.
    fn checked_after(self, after: Duration) -> Option<Self>;
}

impl Deadline for std::time::Instant {
    fn checked_after(self, after: Duration) -> Option<Self> {
        self.checked_add(after)
    }
}

/// Abstract environment providing time, randomness, and async primitives.
///
/// # Invariants
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards
/// - Given the same seed, simulation implementations produce the same random
///   sequence
/// - Methods are infallible except in exceptional circumstances (e.g., OS
///   entropy exhaustion, incorrect simulation setup)
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, while simulation
    /// environments use a virtual instant that only moves when told to.
    type Instant: Copy
        + Ord
        + Send
        + Sync
        + std::fmt::Debug
        + std::ops::Sub<Output = Duration>
        + std::ops::Add<Duration, Output = Self::Instant>
        + Deadline;

    /// Current time (monotonic).
    ///
    /// # Invariants
    ///
    /// - This method MUST return values that never decrease within a single
    ///   execution context.
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only used by driver code. The simulator itself never sleeps; it is
    /// advanced through `handle_tick`.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Wall-clock time in milliseconds since the Unix epoch.
    ///
    /// Used for message timestamps only, never for scheduling.
    fn wall_clock_millis(&self) -> u64;

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a random `u128`.
    ///
    /// Useful for opaque locators.
    fn random_u128(&self) -> u128 {
        let mut bytes = [0u8; 16];
        self.random_bytes(&mut bytes);
        u128::from_be_bytes(bytes)
    }

    /// Uniform sample in `[0, 1)` built from the top 53 bits of a `u64`.
    fn random_unit(&self) -> f64 {
        (self.random_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns `true` with the given probability.
    ///
    /// Probabilities at or below zero never fire, at or above one always fire.
    fn chance(&self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.random_unit() < probability
    }

    /// Picks an index in `0..len`. Returns `None` for an empty range.
    fn choose_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.random_u64() % len as u64) as usize)
    }
}
