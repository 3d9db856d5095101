//! Global politeness policy towards the portal
//!
//! All navigation tasks share one throttle. Request starts are spaced by an
//! adaptive delay: after each response the delay moves towards
//! `latency / target_concurrency`, clamped between the configured minimum and
//! maximum. Slow responses push the delay up, fast ones pull it back down,
//! and a failed response is never allowed to shrink it.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;

struct ThrottleState {
    /// Current spacing between request starts
    delay: Duration,
    /// Earliest instant the next request may start
    next_slot: Option<Instant>,
}

/// Adaptive request throttle shared by all navigation tasks
pub struct AutoThrottle {
    state: Mutex<ThrottleState>,
    min_delay: Duration,
    max_delay: Duration,
    target_concurrency: f64,
}

impl AutoThrottle {
    pub fn new(config: &Config) -> Self {
        Self::with_limits(
            Duration::from_millis(config.start_delay_ms),
            Duration::from_millis(config.min_delay_ms),
            Duration::from_millis(config.max_delay_ms),
            config.target_concurrency,
        )
    }

    pub fn with_limits(
        start_delay: Duration,
        min_delay: Duration,
        max_delay: Duration,
        target_concurrency: f64,
    ) -> Self {
        let delay = start_delay.clamp(min_delay, max_delay);
        Self {
            state: Mutex::new(ThrottleState {
                delay,
                next_slot: None,
            }),
            min_delay,
            max_delay,
            target_concurrency: target_concurrency.max(1.0),
        }
    }

    /// Wait for the next request slot
    ///
    /// Reserves the slot under the lock, then sleeps outside it so other
    /// tasks can queue up behind.
    pub async fn acquire(&self) {
        let start_at = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            let start_at = match state.next_slot {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            state.next_slot = Some(start_at + state.delay);
            start_at
        };
        tokio::time::sleep_until(start_at).await;
    }

    /// Feed one response back into the throttle
    ///
    /// `ok` is whether the response was a success; failures never decrease
    /// the delay.
    pub async fn record(&self, latency: Duration, ok: bool) {
        let mut state = self.state.lock().await;
        let target_delay = latency.div_f64(self.target_concurrency);
        let mut new_delay = (state.delay + target_delay).div_f64(2.0);
        if !ok && new_delay < state.delay {
            new_delay = state.delay;
        }
        state.delay = new_delay.clamp(self.min_delay, self.max_delay);
        debug!(
            "throttle: latency {:?} -> delay {:?}",
            latency, state.delay
        );
    }

    /// Current spacing between request starts
    pub async fn current_delay(&self) -> Duration {
        self.state.lock().await.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle(start_ms: u64, min_ms: u64, max_ms: u64, target: f64) -> AutoThrottle {
        AutoThrottle::with_limits(
            Duration::from_millis(start_ms),
            Duration::from_millis(min_ms),
            Duration::from_millis(max_ms),
            target,
        )
    }

    #[tokio::test]
    async fn slow_responses_raise_the_delay() {
        let t = throttle(100, 0, 60_000, 2.0);
        t.record(Duration::from_secs(4), true).await;
        // (100ms + 4s/2) / 2 = 1050ms
        assert_eq!(t.current_delay().await, Duration::from_millis(1_050));
    }

    #[tokio::test]
    async fn fast_responses_lower_the_delay_but_not_below_minimum() {
        let t = throttle(1_000, 500, 60_000, 10.0);
        for _ in 0..20 {
            t.record(Duration::from_millis(10), true).await;
        }
        assert_eq!(t.current_delay().await, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn failed_responses_never_shrink_the_delay() {
        let t = throttle(2_000, 0, 60_000, 10.0);
        t.record(Duration::from_millis(1), false).await;
        assert_eq!(t.current_delay().await, Duration::from_millis(2_000));
    }

    #[tokio::test]
    async fn delay_is_capped_at_the_maximum() {
        let t = throttle(1_000, 0, 3_000, 1.0);
        t.record(Duration::from_secs(600), true).await;
        assert_eq!(t.current_delay().await, Duration::from_millis(3_000));
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_spaces_request_starts() {
        let t = throttle(1_000, 1_000, 60_000, 10.0);
        let begin = Instant::now();
        t.acquire().await; // first slot is immediate
        t.acquire().await; // second slot waits one delay
        assert!(begin.elapsed() >= Duration::from_millis(1_000));
    }
}
