//! Debounced preview refresh
//!
//! Value-changed callbacks call [`RefreshScheduler::request`]; the host loop
//! calls [`RefreshScheduler::poll`]. Any number of requests made before the
//! refresh runs collapse into one. Interior mutability lets the scheduler be
//! shared through an `Rc` with the callbacks that feed it, including ones
//! triggered from inside the refresh itself.

use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::AppConfig;

#[derive(Debug)]
pub struct RefreshScheduler {
    delay: Duration,
    /// Time of the most recent request while one is pending
    pending_since: Cell<Option<Instant>>,
    running: Cell<bool>,
    absorbed: Cell<u64>,
    runs: Cell<u64>,
}

impl RefreshScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: Cell::new(None),
            running: Cell::new(false),
            absorbed: Cell::new(0),
            runs: Cell::new(0),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::from_millis(config.preview_debounce_ms)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn request(&self) {
        self.request_at(Instant::now());
    }

    /// Mark a refresh as pending. Each request pushes the deadline back.
    pub fn request_at(&self, now: Instant) {
        if self.pending_since.get().is_some() {
            self.absorbed.set(self.absorbed.get() + 1);
        }
        self.pending_since.set(Some(now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.get().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Requests folded into an already pending refresh
    pub fn absorbed(&self) -> u64 {
        self.absorbed.get()
    }

    /// Completed refreshes
    pub fn runs(&self) -> u64 {
        self.runs.get()
    }

    pub fn poll(&self, refresh: impl FnOnce()) -> bool {
        self.poll_at(Instant::now(), refresh)
    }

    /// Run `refresh` if the pending request is older than the delay.
    /// Returns whether it ran.
    pub fn poll_at(&self, now: Instant, refresh: impl FnOnce()) -> bool {
        match self.pending_since.get() {
            Some(since) if now.saturating_duration_since(since) >= self.delay => self.run(refresh),
            _ => false,
        }
    }

    /// Run a pending refresh immediately
    pub fn flush(&self, refresh: impl FnOnce()) -> bool {
        if self.is_pending() {
            self.run(refresh)
        } else {
            false
        }
    }

    fn run(&self, refresh: impl FnOnce()) -> bool {
        if self.running.get() {
            return false;
        }
        self.pending_since.set(None);
        self.running.set(true);
        refresh();
        self.running.set(false);
        self.runs.set(self.runs.get() + 1);
        debug!(runs = self.runs.get(), pending = self.is_pending(), "Preview refresh ran");
        true
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::from_millis(crate::constants::config::DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn test_requests_coalesce() {
        let scheduler = RefreshScheduler::new(DELAY);
        let start = Instant::now();
        scheduler.request_at(start);
        scheduler.request_at(start);
        scheduler.request_at(start);

        let mut count = 0;
        assert!(scheduler.poll_at(start + DELAY, || count += 1));
        assert!(!scheduler.poll_at(start + DELAY * 2, || count += 1));
        assert_eq!(count, 1);
        assert_eq!(scheduler.absorbed(), 2);
    }

    #[test]
    fn test_poll_waits_for_delay() {
        let scheduler = RefreshScheduler::new(DELAY);
        let start = Instant::now();
        scheduler.request_at(start);

        assert!(!scheduler.poll_at(start + DELAY / 2, || {}));
        assert!(scheduler.is_pending());
        assert!(scheduler.poll_at(start + DELAY, || {}));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_later_request_pushes_deadline() {
        let scheduler = RefreshScheduler::new(DELAY);
        let start = Instant::now();
        scheduler.request_at(start);
        scheduler.request_at(start + DELAY / 2);

        assert!(!scheduler.poll_at(start + DELAY, || {}));
        assert!(scheduler.poll_at(start + DELAY + DELAY / 2, || {}));
    }

    #[test]
    fn test_request_during_refresh_schedules_one_more() {
        let scheduler = Rc::new(RefreshScheduler::new(Duration::ZERO));
        scheduler.request();

        let inner = Rc::clone(&scheduler);
        let ran = scheduler.flush(|| {
            inner.request();
            inner.request();
            // re-entrant poll is refused while running
            assert!(!inner.flush(|| {}));
        });

        assert!(ran);
        assert!(scheduler.is_pending());
        assert!(scheduler.flush(|| {}));
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.runs(), 2);
    }

    #[test]
    fn test_delay_from_config() {
        let config = AppConfig {
            preview_debounce_ms: 50,
            ..AppConfig::default()
        };
        assert_eq!(RefreshScheduler::from_config(&config).delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_flush_without_request_is_noop() {
        let scheduler = RefreshScheduler::default();
        let mut ran = false;
        assert!(!scheduler.flush(|| ran = true));
        assert!(!ran);
    }
}
