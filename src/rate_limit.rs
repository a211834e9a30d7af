use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::Duration;

// Call log - admission timestamps (ms since epoch) for one target, oldest first
#[derive(Debug, Default)]
pub struct CallLog {
    calls: VecDeque<i64>,
}

impl CallLog {
    // drop everything that is at least one window old
    fn prune(&mut self, now_ms: i64, window_ms: i64) {
        while let Some(&oldest) = self.calls.front() {
            if now_ms - oldest >= window_ms {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }

    fn len(&self) -> usize {
        self.calls.len()
    }
}

/// Sliding window limiter with an independent budget per target.
///
/// Each check prunes, decides and records while holding the map entry's
/// write guard, so concurrent calls for the same target cannot over-admit.
pub struct RateLimiter {
    logs: DashMap<String, CallLog>,
    max: usize,
    window_ms: i64,
}

impl RateLimiter {
    pub fn new(max: usize, window: Duration) -> Self {
        Self {
            logs: DashMap::new(),
            max,
            window_ms: window.as_millis() as i64,
        }
    }

    pub fn admit(&self, target: &str) -> bool {
        self.admit_at(target, chrono::Utc::now().timestamp_millis())
    }

    pub fn admit_at(&self, target: &str, now_ms: i64) -> bool {
        let mut log = self.logs.entry(target.to_string()).or_default();

        log.prune(now_ms, self.window_ms);

        // over limit, rejected calls are not recorded
        if log.len() >= self.max {
            return false;
        }

        log.calls.push_back(now_ms);
        true
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms as u64)
    }
}
