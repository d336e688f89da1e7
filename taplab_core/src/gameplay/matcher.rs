use std::collections::VecDeque;

use drill_schema::{Channel, Millis};
use drill_scheduler::ExpectedInstant;
use serde::Serialize;
use tracing::{debug, warn};

use crate::gameplay::windows::{Grade, HitWindows};
use crate::input::events::TapEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteState {
    Unreleased,
    Pending,
    Resolved,
    Missed,
}

/// A tap paired with an expected instant and graded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Judgment {
    pub instant_index: usize,
    pub grade: Grade,
    /// `timestamp - instant time`; negative is early.
    pub offset_ms: Millis,
    pub channel: Channel,
    pub timestamp_ms: Millis,
}

/// An instant evicted because nobody tapped it in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissedNote {
    pub instant_index: usize,
    pub time_ms: Millis,
    /// How far past the instant the eviction happened.
    pub late_by_ms: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TapOutcome {
    /// Nothing was pending; the tap has no effect.
    Ignored,
    Hit(Judgment),
    /// The nearest pending instant is further away than the MEH window.
    OutOfWindow { instant_index: usize, offset_ms: Millis },
    /// The nearest pending instant requires the other channel. The instant
    /// stays pending; the attempt counts as a miss.
    ChannelMismatch {
        instant_index: usize,
        expected: Channel,
        got: Channel,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub released: usize,
    pub missed: Vec<MissedNote>,
}

/// Where a pending note sits on its approach, for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApproachCue {
    pub instant_index: usize,
    pub channel: Option<Channel>,
    /// Negative once the instant has passed.
    pub due_in_ms: Millis,
    /// 0 at release, 1 at the instant, above 1 while waiting for eviction.
    pub progress: f64,
}

/// Pairs taps with expected instants.
///
/// Instants wait in a FIFO queue until `time - lookahead <= now`, then sit in
/// the pending set until a tap resolves them or they fall more than MEH
/// behind `now`. A tap always goes to the nearest pending instant, not the
/// oldest one.
pub struct TapMatcher {
    queue: VecDeque<ExpectedInstant>,
    pending: Vec<ExpectedInstant>,
    states: Vec<Option<NoteState>>,
    windows: HitWindows,
    lookahead_ms: Millis,
}

impl TapMatcher {
    pub fn new(instants: Vec<ExpectedInstant>, windows: HitWindows, lookahead_ms: Millis) -> Self {
        let len = instants.iter().map(|i| i.index + 1).max().unwrap_or(0);
        let mut states = vec![None; len];
        let mut queue = VecDeque::with_capacity(instants.len());
        let mut last_time = f64::NEG_INFINITY;

        for instant in instants {
            if !instant.time_ms.is_finite() || instant.time_ms < last_time {
                warn!(
                    index = instant.index,
                    time_ms = instant.time_ms,
                    "dropping out-of-order instant"
                );
                continue;
            }
            if states[instant.index].is_some() {
                warn!(index = instant.index, "dropping duplicate instant index");
                continue;
            }
            last_time = instant.time_ms;
            states[instant.index] = Some(NoteState::Unreleased);
            queue.push_back(instant);
        }

        Self {
            queue,
            pending: Vec::new(),
            states,
            windows,
            lookahead_ms: lookahead_ms.max(0.0),
        }
    }

    pub fn windows(&self) -> HitWindows {
        self.windows
    }

    pub fn lookahead_ms(&self) -> Millis {
        self.lookahead_ms
    }

    pub fn pending(&self) -> &[ExpectedInstant] {
        &self.pending
    }

    pub fn unreleased(&self) -> usize {
        self.queue.len()
    }

    pub fn state(&self, index: usize) -> Option<NoteState> {
        self.states.get(index).copied().flatten()
    }

    /// Every instant has been resolved or missed.
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty() && self.pending.is_empty()
    }

    /// One clock tick: release due instants, then evict expired ones.
    pub fn advance(&mut self, now: Millis) -> TickReport {
        let mut report = TickReport::default();

        while let Some(head) = self.queue.front() {
            if head.time_ms - self.lookahead_ms > now {
                break;
            }
            let Some(instant) = self.queue.pop_front() else {
                break;
            };
            self.set_state(instant.index, NoteState::Pending);
            self.pending.push(instant);
            report.released += 1;
        }

        let cutoff = self.windows.miss_cutoff_ms();
        let mut evicted = Vec::new();
        self.pending.retain(|instant| {
            let late_by = now - instant.time_ms;
            if late_by > cutoff {
                evicted.push(MissedNote {
                    instant_index: instant.index,
                    time_ms: instant.time_ms,
                    late_by_ms: late_by,
                });
                false
            } else {
                true
            }
        });

        for missed in &evicted {
            self.set_state(missed.instant_index, NoteState::Missed);
            debug!(
                index = missed.instant_index,
                late_by_ms = missed.late_by_ms,
                "note missed"
            );
        }
        report.missed = evicted;
        report
    }

    pub fn process_tap(&mut self, event: TapEvent) -> TapOutcome {
        let Some(slot) = self.nearest_pending(event.timestamp_ms) else {
            return TapOutcome::Ignored;
        };
        let instant = self.pending[slot];

        if let Some(expected) = instant.channel {
            if expected != event.channel {
                debug!(
                    index = instant.index,
                    expected = expected.as_str(),
                    got = event.channel.as_str(),
                    "channel mismatch"
                );
                return TapOutcome::ChannelMismatch {
                    instant_index: instant.index,
                    expected,
                    got: event.channel,
                };
            }
        }

        let offset_ms = event.timestamp_ms - instant.time_ms;
        let Some(grade) = self.windows.grade(offset_ms) else {
            return TapOutcome::OutOfWindow {
                instant_index: instant.index,
                offset_ms,
            };
        };

        self.pending.remove(slot);
        self.set_state(instant.index, NoteState::Resolved);
        debug!(index = instant.index, offset_ms, ?grade, "note hit");

        TapOutcome::Hit(Judgment {
            instant_index: instant.index,
            grade,
            offset_ms,
            channel: event.channel,
            timestamp_ms: event.timestamp_ms,
        })
    }

    pub fn approach_cues(&self, now: Millis) -> Vec<ApproachCue> {
        self.pending
            .iter()
            .map(|instant| {
                let progress = if self.lookahead_ms > 0.0 {
                    (now - (instant.time_ms - self.lookahead_ms)) / self.lookahead_ms
                } else {
                    1.0
                };
                ApproachCue {
                    instant_index: instant.index,
                    channel: instant.channel,
                    due_in_ms: instant.time_ms - now,
                    progress,
                }
            })
            .collect()
    }

    /// Linear scan; the pending set holds a handful of notes at most.
    /// Ties go to the earlier instant.
    fn nearest_pending(&self, timestamp: Millis) -> Option<usize> {
        let mut best: Option<(usize, Millis)> = None;
        for (slot, instant) in self.pending.iter().enumerate() {
            let delta = (timestamp - instant.time_ms).abs();
            match best {
                Some((_, best_delta)) if delta >= best_delta => {}
                _ => best = Some((slot, delta)),
            }
        }
        best.map(|(slot, _)| slot)
    }

    fn set_state(&mut self, index: usize, state: NoteState) {
        if let Some(entry) = self.states.get_mut(index) {
            *entry = Some(state);
        }
    }
}
