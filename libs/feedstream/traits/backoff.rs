use rand::Rng;
use std::time::Duration;

/// Trait for defining reconnect delay policies
///
/// Implement this trait to control how the consumer should behave when
/// reconnecting after a disconnection.
pub trait ReconnectPolicy: Send + Sync {
    /// Get the delay before the next reconnect attempt
    ///
    /// # Arguments
    /// * `attempt` - The reconnect attempt number (0-indexed)
    ///
    /// # Returns
    /// * `Some(duration)` - Wait this long before reconnecting
    /// * `None` - Stop reconnecting
    fn next_delay(&self, attempt: usize) -> Option<Duration>;

    /// Check if reconnecting should continue at this attempt number
    fn should_reconnect(&self, attempt: usize) -> bool;
}

/// Exponential backoff with full jitter
///
/// Attempt `n` sleeps a uniform random duration in `[0, ceiling]` where the
/// ceiling is `base * 2^n` capped at `cap`. The randomness spreads retries
/// out so that clients dropped by the same outage do not reconnect in
/// lockstep.
#[derive(Debug, Clone)]
pub struct JitteredBackoff {
    base: Duration,
    cap: Duration,
    max_attempts: Option<usize>,
}

impl JitteredBackoff {
    /// Create a new jittered backoff policy
    ///
    /// # Arguments
    /// * `base` - Ceiling for the first attempt
    /// * `cap` - Maximum ceiling for any attempt
    /// * `max_attempts` - Maximum number of attempts (None = unlimited)
    pub fn new(base: Duration, cap: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            base,
            cap,
            max_attempts,
        }
    }

    /// Deterministic upper bound for the delay at `attempt`
    ///
    /// Grows as `base * 2^attempt`, saturating at `cap`. Exposed separately
    /// from [`next_delay`](ReconnectPolicy::next_delay) so the growth curve
    /// can be asserted without sampling.
    pub fn ceiling(&self, attempt: usize) -> Duration {
        let base_ms = self.base.as_millis() as u64;
        let exponent = u32::try_from(attempt).unwrap_or(u32::MAX);
        let ceiling_ms = base_ms.saturating_mul(2u64.saturating_pow(exponent));
        Duration::from_millis(ceiling_ms.min(self.cap.as_millis() as u64))
    }
}

impl Default for JitteredBackoff {
    /// Base 1s, cap 30s, unlimited attempts
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30), None)
    }
}

impl ReconnectPolicy for JitteredBackoff {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_reconnect(attempt) {
            return None;
        }

        let ceiling_ms = self.ceiling(attempt).as_millis() as u64;
        let delay_ms = rand::thread_rng().gen_range(0..=ceiling_ms);
        Some(Duration::from_millis(delay_ms))
    }

    fn should_reconnect(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Fixed delay reconnect policy
///
/// Always waits the same amount of time between reconnect attempts
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
    max_attempts: Option<usize>,
}

impl FixedDelay {
    /// Create a new fixed delay policy
    ///
    /// # Arguments
    /// * `delay` - The fixed delay between reconnects
    /// * `max_attempts` - Maximum number of attempts (None = unlimited)
    pub fn new(delay: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }
}

impl ReconnectPolicy for FixedDelay {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_reconnect(attempt) {
            return None;
        }
        Some(self.delay)
    }

    fn should_reconnect(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Never reconnect policy
///
/// The consumer will not attempt to reconnect after disconnection
#[derive(Debug, Clone)]
pub struct NeverReconnect;

impl ReconnectPolicy for NeverReconnect {
    fn next_delay(&self, _attempt: usize) -> Option<Duration> {
        None
    }

    fn should_reconnect(&self, _attempt: usize) -> bool {
        false
    }
}
