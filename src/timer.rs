//! Deadline timers checked from the frame loop.
//!
//! A [`Deadline`] is a single optional due time. Arming replaces whatever
//! was pending, cancelling is always safe, and [`Deadline::poll`] reports
//! expiry exactly once. There are no callbacks: the owner polls on every
//! frame and reacts to the result itself.

use std::time::Duration;

/// A one-shot, replaceable deadline on the simulation clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deadline {
    due: Option<Duration>,
}

impl Deadline {
    pub const fn new() -> Self {
        Self { due: None }
    }

    /// Arm the deadline to expire `delay` after `now`, replacing any pending one.
    pub fn arm(&mut self, now: Duration, delay: Duration) {
        self.due = Some(now + delay);
    }

    /// Cancel the pending deadline. Returns whether one was pending.
    ///
    /// Cancelling an expired or already-cancelled deadline does nothing.
    pub fn cancel(&mut self) -> bool {
        self.due.take().is_some()
    }

    /// Whether a deadline is pending.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// When the pending deadline is due.
    #[inline]
    pub fn due(&self) -> Option<Duration> {
        self.due
    }

    /// Time left until expiry, zero if overdue, `None` if not armed.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.due.map(|due| due.saturating_sub(now))
    }

    /// Returns `true` once when `now` has reached the due time, then disarms.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_fires_once_at_due_time() {
        let mut d = Deadline::new();
        d.arm(ms(100), ms(50));
        assert!(!d.poll(ms(149)));
        assert!(d.poll(ms(150)));
        assert!(!d.poll(ms(151)));
        assert!(!d.is_armed());
    }

    #[test]
    fn test_arm_replaces_pending() {
        let mut d = Deadline::new();
        d.arm(ms(0), ms(100));
        d.arm(ms(50), ms(100));
        assert_eq!(d.due(), Some(ms(150)));
        assert!(!d.poll(ms(100)));
        assert!(d.poll(ms(150)));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut d = Deadline::new();
        assert!(!d.cancel());
        d.arm(ms(0), ms(10));
        assert!(d.cancel());
        assert!(!d.cancel());
        assert!(!d.poll(ms(1_000)));

        d.arm(ms(0), ms(10));
        assert!(d.poll(ms(10)));
        assert!(!d.cancel());
    }

    #[test]
    fn test_remaining() {
        let mut d = Deadline::new();
        assert_eq!(d.remaining(ms(0)), None);
        d.arm(ms(10), ms(90));
        assert_eq!(d.remaining(ms(40)), Some(ms(60)));
        assert_eq!(d.remaining(ms(500)), Some(Duration::ZERO));
    }
}
