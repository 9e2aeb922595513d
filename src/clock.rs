//! Monotonic clocks in fractional milliseconds

use once_cell::sync::Lazy;
use std::sync::Mutex;
use std::time::Instant;

static PROCESS_ANCHOR: Lazy<Instant> = Lazy::new(Instant::now);

/// Source of monotonic time in milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// High resolution process clock.
///
/// Readings are milliseconds since a process-wide anchor, so values from
/// different `MonotonicClock`s are comparable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        PROCESS_ANCHOR.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Mutex<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Mutex::new(start_ms),
        }
    }

    /// Move the clock forward. Negative steps are ignored.
    pub fn advance(&self, ms: f64) {
        if ms <= 0.0 {
            return;
        }
        let mut now = self.now_ms.lock().unwrap_or_else(|e| e.into_inner());
        *now += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now_ms.lock().unwrap_or_else(|e| e.into_inner())
    }
}
