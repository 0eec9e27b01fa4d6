//! Simulation policy for the conversation lifecycle.
//!
//! Every delay and probability the simulator uses lives here so callers can
//! tune the simulated peer without touching lifecycle logic. The defaults
//! reproduce the prototype's behaviour.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Delay before an outgoing message is marked delivered.
pub const DEFAULT_DELIVERED_AFTER: Duration = Duration::from_secs(1);

/// Delay before an outgoing message is marked read.
pub const DEFAULT_READ_AFTER: Duration = Duration::from_secs(3);

/// Probability that the simulated peer answers an outgoing message.
pub const DEFAULT_REPLY_PROBABILITY: f64 = 0.7;

/// Delay before the peer starts "typing" a reply.
pub const DEFAULT_REPLY_TYPING_AFTER: Duration = Duration::from_secs(2);

/// Delay before the peer's reply lands.
pub const DEFAULT_REPLY_AFTER: Duration = Duration::from_secs(4);

/// Time a revealed one-time-view attachment stays visible.
pub const DEFAULT_ONE_TIME_VIEW_GRACE: Duration = Duration::from_secs(5);

/// Content that replaces an expired one-time-view attachment.
pub const EXPIRED_MEDIA_MARKER: &str = "This media has expired";

/// Period of the ambient typing simulation.
pub const DEFAULT_AMBIENT_TYPING_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest ambient typing period the simulator honours.
pub const MIN_AMBIENT_TYPING_INTERVAL: Duration = Duration::from_millis(100);

/// Probability that an ambient tick shows the typing indicator.
pub const DEFAULT_AMBIENT_TYPING_PROBABILITY: f64 = 0.3;

/// How long an ambient typing burst lasts.
pub const DEFAULT_AMBIENT_TYPING_DURATION: Duration = Duration::from_secs(3);

/// TTL applied to ephemeral messages that do not carry one.
pub const DEFAULT_EPHEMERAL_TTL: Duration = Duration::from_secs(10);

/// Canned replies used by the simulated peer.
pub const DEFAULT_REPLIES: [&str; 6] = [
    "That's interesting!",
    "I see what you mean.",
    "Tell me more about that.",
    "I was just thinking about that!",
    "Good point!",
    "I'm not sure I agree, but I see your perspective.",
];

/// Simulation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Delay until an outgoing message becomes delivered.
    pub delivered_after: Duration,
    /// Delay until an outgoing message becomes read.
    pub read_after: Duration,
    /// Probability in `[0, 1]` that an outgoing message gets a reply.
    pub reply_probability: f64,
    /// Delay until the typing indicator for a reply appears.
    pub reply_typing_after: Duration,
    /// Delay until the reply is appended.
    pub reply_after: Duration,
    /// Replies the simulated peer picks from.
    pub reply_pool: Vec<String>,
    /// Grace period between revealing one-time media and its expiry.
    pub one_time_view_grace: Duration,
    /// Content written over an expired one-time-view message.
    pub expired_media_marker: String,
    /// Period of the ambient typing tick.
    pub ambient_typing_interval: Duration,
    /// Probability in `[0, 1]` that an ambient tick shows typing.
    pub ambient_typing_probability: f64,
    /// Length of an ambient typing burst.
    pub ambient_typing_duration: Duration,
    /// TTL for ephemeral messages without an explicit one.
    pub default_ephemeral_ttl: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            delivered_after: DEFAULT_DELIVERED_AFTER,
            read_after: DEFAULT_READ_AFTER,
            reply_probability: DEFAULT_REPLY_PROBABILITY,
            reply_typing_after: DEFAULT_REPLY_TYPING_AFTER,
            reply_after: DEFAULT_REPLY_AFTER,
            reply_pool: DEFAULT_REPLIES.iter().map(|r| (*r).to_string()).collect(),
            one_time_view_grace: DEFAULT_ONE_TIME_VIEW_GRACE,
            expired_media_marker: EXPIRED_MEDIA_MARKER.to_string(),
            ambient_typing_interval: DEFAULT_AMBIENT_TYPING_INTERVAL,
            ambient_typing_probability: DEFAULT_AMBIENT_TYPING_PROBABILITY,
            ambient_typing_duration: DEFAULT_AMBIENT_TYPING_DURATION,
            default_ephemeral_ttl: DEFAULT_EPHEMERAL_TTL,
        }
    }
}

impl SimulationConfig {
    /// Policy with every random path disabled.
    ///
    /// Useful for scenarios that need an exact message count.
    #[must_use]
    pub fn quiet() -> Self {
        Self { reply_probability: 0.0, ambient_typing_probability: 0.0, ..Self::default() }
    }

    /// Ambient typing period, clamped to [`MIN_AMBIENT_TYPING_INTERVAL`].
    ///
    /// A zero period would re-fire the ambient tick forever within one
    /// `handle_tick`.
    pub fn ambient_interval(&self) -> Duration {
        self.ambient_typing_interval.max(MIN_AMBIENT_TYPING_INTERVAL)
    }

    /// Check the policy for values the simulator cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("reply_probability", self.reply_probability),
            ("ambient_typing_probability", self.ambient_typing_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }

        if self.ambient_typing_interval.is_zero() {
            return Err(ConfigError::ZeroInterval { field: "ambient_typing_interval" });
        }

        if self.default_ephemeral_ttl.is_zero() {
            return Err(ConfigError::ZeroInterval { field: "default_ephemeral_ttl" });
        }

        if self.reply_pool.is_empty() && self.reply_probability > 0.0 {
            return Err(ConfigError::EmptyReplyPool);
        }

        if self.reply_after < self.reply_typing_after {
            return Err(ConfigError::ReplyBeforeTyping {
                typing_after: self.reply_typing_after,
                reply_after: self.reply_after,
            });
        }

        Ok(())
    }
}
