//! Rate Limiter - per-client fixed window counters
//!
//! Windows reset lazily on the first call after they expire. A client may
//! burst up to twice the limit across a window boundary.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Counter {
    window_start: Instant,
    count: u32,
}

pub struct RateLimiter {
    limit: u32,
    window: Duration,
    counters: Mutex<HashMap<String, Counter>>,
}

impl RateLimiter {
    /// Limiter with the standard one-minute window
    pub fn new(limit_per_minute: u32) -> Self {
        Self::with_window(limit_per_minute, DEFAULT_WINDOW)
    }

    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Count this call and report whether it is within the limit
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut counters = self.counters.lock();

        let counter = counters.entry(key.to_string()).or_insert(Counter {
            window_start: now,
            count: 0,
        });
        if now.duration_since(counter.window_start) >= self.window {
            counter.window_start = now;
            counter.count = 0;
        }
        counter.count = counter.count.saturating_add(1);

        counter.count <= self.limit
    }

    /// Number of clients with a live counter
    pub fn tracked_clients(&self) -> usize {
        self.counters.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_limit_then_throttle() {
        let limiter = RateLimiter::new(3);
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));
        assert!(limiter.allow("b"));
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::with_window(2, Duration::from_millis(50));
        assert!(limiter.allow("k"));
        assert!(limiter.allow("k"));
        assert!(!limiter.allow("k"));

        thread::sleep(Duration::from_millis(80));
        assert!(limiter.allow("k"));
    }

    #[test]
    fn test_concurrent_callers_share_one_budget() {
        let limiter = Arc::new(RateLimiter::new(50));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || (0..20).filter(|_| limiter.allow("shared")).count())
            })
            .collect();

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 50);
    }
}
