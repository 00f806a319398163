// Clock Sources
// Monotonic millisecond time for episode windows and history timestamps

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Millisecond time source. Readings must never decrease.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall-clock milliseconds that cannot run backwards.
///
/// The epoch offset is read once at construction; later readings add the
/// elapsed `Instant`, so NTP slews after startup do not reorder timestamps.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch_ms: i64,
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        Self {
            epoch_ms,
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        self.epoch_ms + self.started.elapsed().as_millis() as i64
    }
}

/// Externally driven clock for replay and tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    /// Move the clock to `ms`; earlier values are ignored.
    pub fn set(&self, ms: i64) {
        self.now_ms.fetch_max(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        if delta_ms > 0 {
            self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
