use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::tracker::Tracker;

/// Monotonic milliseconds since the server started; the tracker's notion of boot.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Mutex<Tracker>>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
            clock: Clock::start(),
        }
    }
}
