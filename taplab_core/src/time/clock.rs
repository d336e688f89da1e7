use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use atomic_float::AtomicF64;
use drill_schema::Millis;

/// Monotonic millisecond time source, read on demand.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Millis;
}

/// Milliseconds elapsed since the clock was created.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to. Clones share the same time, so a
/// test or replay can hand one copy to the driver and keep another to step it.
#[derive(Clone)]
pub struct ManualClock {
    time: Arc<AtomicF64>,
}

impl ManualClock {
    pub fn new(start_ms: Millis) -> Self {
        Self {
            time: Arc::new(AtomicF64::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: Millis) {
        self.time.store(now_ms, Ordering::Release);
    }

    pub fn advance(&self, delta_ms: Millis) -> Millis {
        self.time.fetch_add(delta_ms, Ordering::AcqRel) + delta_ms
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.time.load(Ordering::Acquire)
    }
}
