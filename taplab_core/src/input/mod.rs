pub mod events;

use self::events::TapEvent;
use crate::time::Clock;
use crossbeam_channel::{unbounded, Receiver, Sender};
use drill_schema::Channel;

/// Carries taps from input threads to the thread that owns the session.
pub struct InputQueue {
    sender: Sender<TapEvent>,
    receiver: Receiver<TapEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Pushes an event into the queue.
    /// This can be called from multiple threads (e.g. input polling thread).
    pub fn push(&self, event: TapEvent) {
        let _ = self.sender.send(event);
    }

    /// Stamps a tap on `channel` with the clock at receipt and queues it.
    pub fn press(&self, channel: Channel, clock: &dyn Clock) {
        self.push(TapEvent::new(clock.now_ms(), channel));
    }

    /// Pops an event from the queue.
    /// Non-blocking. Returns None if queue is empty.
    pub fn pop(&self) -> Option<TapEvent> {
        self.receiver.try_recv().ok()
    }

    /// Takes everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<TapEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns a clone of the sender, allowing it to be passed to other threads/structs.
    pub fn sender(&self) -> Sender<TapEvent> {
        self.sender.clone()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
