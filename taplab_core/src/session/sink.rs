use std::sync::Arc;

use drill_schema::{Channel, Millis};
use parking_lot::Mutex;
use serde::Serialize;

use crate::gameplay::{ApproachCue, Grade};

/// Receives fire-and-forget feedback from a running session (audio clicks,
/// hit effects, approach circles). Implementations must not block.
pub trait FeedbackSink: Send {
    fn on_hit(&mut self, _grade: Grade, _offset_ms: Millis, _channel: Channel) {}

    fn on_miss(&mut self) {}

    fn on_tick(&mut self, _now_ms: Millis, _cues: &[ApproachCue]) {}
}

pub struct NullSink;

impl FeedbackSink for NullSink {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SinkEvent {
    Hit {
        grade: Grade,
        offset_ms: Millis,
        channel: Channel,
    },
    Miss,
}

/// Keeps hit/miss notifications in order; ticks are only counted.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub events: Vec<SinkEvent>,
    pub ticks: usize,
    pub max_pending_seen: usize,
}

impl FeedbackSink for CollectingSink {
    fn on_hit(&mut self, grade: Grade, offset_ms: Millis, channel: Channel) {
        self.events.push(SinkEvent::Hit {
            grade,
            offset_ms,
            channel,
        });
    }

    fn on_miss(&mut self) {
        self.events.push(SinkEvent::Miss);
    }

    fn on_tick(&mut self, _now_ms: Millis, cues: &[ApproachCue]) {
        self.ticks += 1;
        self.max_pending_seen = self.max_pending_seen.max(cues.len());
    }
}

/// Forwards to a sink shared with another thread (e.g. a test or UI that
/// inspects what the session emitted).
impl<S: FeedbackSink + ?Sized> FeedbackSink for Arc<Mutex<S>> {
    fn on_hit(&mut self, grade: Grade, offset_ms: Millis, channel: Channel) {
        self.lock().on_hit(grade, offset_ms, channel);
    }

    fn on_miss(&mut self) {
        self.lock().on_miss();
    }

    fn on_tick(&mut self, now_ms: Millis, cues: &[ApproachCue]) {
        self.lock().on_tick(now_ms, cues);
    }
}
