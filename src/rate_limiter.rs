//! Sliding-window limiter for outbound provider requests

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Caps outbound calls to at most `max_requests` in any trailing `window`
///
/// Only permitted requests are recorded, so rejected attempts don't consume
/// budget.
pub struct RateLimiter {
    requests: Mutex<VecDeque<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    /// Creates a limiter with an empty window
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Mutex::new(VecDeque::new()),
            max_requests,
            window,
        }
    }

    /// Drops timestamps that are at least one window old
    fn prune(requests: &mut VecDeque<Instant>, window: Duration, now: Instant) {
        while let Some(oldest) = requests.front() {
            if now.duration_since(*oldest) >= window {
                requests.pop_front();
            } else {
                break;
            }
        }
    }

    /// Returns true and records the request if the window has room
    pub async fn can_make_request(&self) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.lock().await;
        Self::prune(&mut requests, self.window, now);

        if requests.len() >= self.max_requests {
            tracing::debug!(
                current = requests.len(),
                max_requests = self.max_requests,
                "Rate limit reached"
            );
            return false;
        }

        requests.push_back(now);
        true
    }

    /// Forgets every recorded request
    pub async fn reset(&self) {
        self.requests.lock().await.clear();
    }

    /// Requests recorded inside the current window
    pub async fn current_requests(&self) -> usize {
        let mut requests = self.requests.lock().await;
        Self::prune(&mut requests, self.window, Instant::now());
        requests.len()
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
