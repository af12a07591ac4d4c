//! Timer-based coalescing of rapid input.
//!
//! The debouncer only does the bookkeeping: each `schedule` hands out a
//! ticket, and the caller starts a timer for `window()` that comes back
//! with that ticket. Only the newest ticket releases the held value, so a
//! burst of keystrokes produces a single update once typing stops.

use std::time::Duration;

/// Default quiet window before a typed query becomes the active search
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    ticket: u64,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            ticket: 0,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Hold `value`, replacing anything already pending.
    /// Returns the ticket the caller's timer must bring back.
    pub fn schedule(&mut self, value: T) -> u64 {
        self.ticket += 1;
        self.pending = Some(value);
        self.ticket
    }

    /// Timer for `ticket` elapsed. Yields the held value only if no newer
    /// input arrived in the meantime.
    pub fn fire(&mut self, ticket: u64) -> Option<T> {
        if ticket != self.ticket {
            return None;
        }
        self.pending.take()
    }

    /// Drop the pending value; outstanding timers will fire into nothing
    pub fn cancel(&mut self) {
        self.ticket += 1;
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_fires() {
        let mut debouncer = Debouncer::default();

        let first = debouncer.schedule("b");
        let second = debouncer.schedule("ba");
        let third = debouncer.schedule("bat");

        assert_eq!(debouncer.fire(first), None);
        assert_eq!(debouncer.fire(second), None);
        assert_eq!(debouncer.fire(third), Some("bat"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_fires_once() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let ticket = debouncer.schedule(42);

        assert_eq!(debouncer.fire(ticket), Some(42));
        assert_eq!(debouncer.fire(ticket), None);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut debouncer = Debouncer::default();
        let ticket = debouncer.schedule(String::from("alien"));

        debouncer.cancel();

        assert_eq!(debouncer.fire(ticket), None);
    }

    #[tokio::test]
    async fn test_with_real_timer() {
        let mut debouncer = Debouncer::new(Duration::from_millis(5));
        let stale = debouncer.schedule("al");
        let latest = debouncer.schedule("alien");

        tokio::time::sleep(debouncer.window()).await;

        assert_eq!(debouncer.fire(stale), None);
        assert_eq!(debouncer.fire(latest), Some("alien"));
    }
}
