//! Render throttling.
//!
//! Deltas can arrive far faster than re-rendering is useful. The throttle
//! turns a burst of requests into at most one render per interval, and
//! guarantees a render after the last request of a burst. Renders always use
//! the latest buffer, so dropped requests lose nothing.

use std::time::{Duration, Instant};

/// Default interval between renders.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(50);

/// Trailing-edge throttle driven by caller-supplied instants.
#[derive(Debug, Clone)]
pub struct RenderThrottle {
    interval: Duration,
    deadline: Option<Instant>,
    once_more: bool,
}

impl RenderThrottle {
    /// Create a throttle allowing one render per `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            once_more: false,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ask for a render.
    ///
    /// The first request arms a deadline one interval from `now`; requests
    /// while armed are coalesced into one more render after it fires.
    pub fn request(&mut self, now: Instant) {
        if self.deadline.is_some() {
            self.once_more = true;
        } else {
            self.deadline = Some(now + self.interval);
        }
    }

    /// Whether a render is due at `now`.
    ///
    /// Returns true at most once per armed deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = if std::mem::take(&mut self.once_more) {
                    Some(now + self.interval)
                } else {
                    None
                };
                true
            }
            _ => false,
        }
    }

    /// Next instant at which [`poll`](Self::poll) may return true.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel pending renders and report whether any was pending.
    pub fn flush(&mut self) -> bool {
        self.once_more = false;
        self.deadline.take().is_some()
    }
}

impl Default for RenderThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_idle_throttle_never_fires() {
        let mut throttle = RenderThrottle::default();
        assert!(!throttle.poll(Instant::now()));
        assert!(!throttle.flush());
    }

    #[test]
    fn test_fires_after_interval() {
        let start = Instant::now();
        let mut throttle = RenderThrottle::new(50 * MS);
        throttle.request(start);

        assert!(!throttle.poll(start + 49 * MS));
        assert!(throttle.poll(start + 50 * MS));
        assert!(!throttle.poll(start + 200 * MS));
    }

    #[test]
    fn test_burst_coalesces_into_two_renders() {
        let start = Instant::now();
        let mut throttle = RenderThrottle::new(50 * MS);
        for offset in 0..40 {
            throttle.request(start + offset * MS);
        }

        assert!(throttle.poll(start + 50 * MS));
        assert_eq!(throttle.deadline(), Some(start + 100 * MS));
        assert!(!throttle.poll(start + 60 * MS));
        assert!(throttle.poll(start + 100 * MS));
        assert!(throttle.deadline().is_none());
    }

    #[test]
    fn test_request_does_not_extend_deadline() {
        let start = Instant::now();
        let mut throttle = RenderThrottle::new(50 * MS);
        throttle.request(start);
        throttle.request(start + 45 * MS);
        assert_eq!(throttle.deadline(), Some(start + 50 * MS));
    }

    #[test]
    fn test_flush_clears_pending() {
        let start = Instant::now();
        let mut throttle = RenderThrottle::new(50 * MS);
        throttle.request(start);
        throttle.request(start + MS);

        assert!(throttle.flush());
        assert!(!throttle.poll(start + 500 * MS));
    }
}
