use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Failed-login throttle keyed by client IP.
#[derive(Clone)]
pub struct LoginThrottle {
    max_failures: usize,
    window: Duration,
    failures: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
}

impl Default for LoginThrottle {
    /// Five failures per fifteen minutes.
    fn default() -> Self {
        Self::new(5, Duration::from_secs(900))
    }
}

impl LoginThrottle {
    pub fn new(max_failures: usize, window: Duration) -> Self {
        Self {
            max_failures,
            window,
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// True when the IP has reached the failure limit inside the window.
    /// Stale timestamps for this IP are dropped as a side effect.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        let mut map = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let Some(stamps) = map.get_mut(&ip) else {
            return false;
        };
        stamps.retain(|t| now.duration_since(*t) < self.window);
        if stamps.is_empty() {
            map.remove(&ip);
            return false;
        }
        stamps.len() >= self.max_failures
    }

    pub fn record_failure(&self, ip: IpAddr) {
        let mut map = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(ip).or_default().push(Instant::now());
    }

    /// Forget an IP after a successful login.
    pub fn clear(&self, ip: IpAddr) {
        let mut map = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&ip);
    }
}
