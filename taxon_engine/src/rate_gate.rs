//! Fixed-interval pacing for the external API.

use std::time::Duration;

/// Interval the Generative Language API free tier tolerates.
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_millis(2500);

/// A fixed-delay gate between consecutive external calls. Not a token bucket: no burst
/// allowance, one caller, one interval. When the API signals throttling the caller can arm a
/// one-shot penalty, doubling the next pause only.
pub struct RateGate {
    delay: Duration,
    penalty_armed: bool,
    waits_issued: usize,
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT_DELAY)
    }
}

impl RateGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            penalty_armed: false,
            waits_issued: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Suspend the calling flow for the configured delay, plus one extra interval when a penalty
    /// was armed since the previous wait.
    pub async fn wait(&mut self) {
        let mut pause = self.delay;
        if std::mem::take(&mut self.penalty_armed) {
            crate::warn!("Throttling observed; extending next pause to {:?}", pause * 2);
            pause *= 2;
        }
        self.waits_issued += 1;
        tokio::time::sleep(pause).await;
    }

    /// Arm the one-shot throttling penalty.
    pub fn penalize(&mut self) {
        self.penalty_armed = true;
    }

    /// Number of completed `wait` calls, for observability and tests.
    pub fn waits_issued(&self) -> usize {
        self.waits_issued
    }
}
