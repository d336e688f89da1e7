use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::input::InputQueue;
use crate::session::{SessionStatus, SharedSession};
use crate::time::Clock;

/// Drives `session` from the current thread until it ends or `stop` is raised.
///
/// Each iteration reads the clock, applies every tap queued since the last
/// iteration (in arrival order), then ticks. Taps and the tick are applied
/// under one lock so they form a single atomic step.
pub fn run_session(
    session: &SharedSession,
    clock: &dyn Clock,
    input: &InputQueue,
    tick_interval: Duration,
    stop: &AtomicBool,
) -> SessionStatus {
    let mut iterations: u64 = 0;
    loop {
        if stop.load(Ordering::Acquire) {
            session.stop();
            break;
        }

        let now = clock.now_ms();
        {
            let mut guard = session.lock();
            for event in input.drain() {
                guard.tap(event);
            }
            guard.tick(now);
            if !guard.is_active() {
                break;
            }
        }

        iterations += 1;
        thread::sleep(tick_interval);
    }

    let status = session.status();
    debug!(iterations, ?status, "driver exited");
    status
}
