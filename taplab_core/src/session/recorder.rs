use std::collections::VecDeque;

use drill_schema::{Channel, Millis};
use serde::{Deserialize, Serialize};
use session_data::HitTally;

use crate::gameplay::{Grade, Judgment};
use crate::stats::RunningStats;

/// One entry of the session's tap log. Never mutated once appended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTap {
    /// Position in the log.
    pub index: usize,
    pub offset_ms: Millis,
    pub channel: Channel,
    pub timestamp_ms: Millis,
}

/// Snapshot of the live aggregates, cheap to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveFeedback {
    pub tap_count: usize,
    pub miss_count: u32,
    pub mean_offset_ms: Millis,
    pub std_dev_ms: Millis,
    pub unstable_rate: f64,
    pub last_offset_ms: Option<Millis>,
    pub interval_std_dev_ms: Millis,
    /// Oldest first.
    pub recent_offsets_ms: Vec<Millis>,
}

/// Owns the append-only tap log and keeps live aggregates current without
/// rescanning it.
#[derive(Debug, Clone)]
pub struct SessionRecorder {
    log: Vec<ResolvedTap>,
    offsets: RunningStats,
    intervals: RunningStats,
    recent: VecDeque<Millis>,
    recent_capacity: usize,
    unstable_rate: f64,
    tally: HitTally,
    last_tap_ms: Option<Millis>,
}

impl SessionRecorder {
    pub fn new(recent_capacity: usize) -> Self {
        let recent_capacity = recent_capacity.max(1);
        Self {
            log: Vec::new(),
            offsets: RunningStats::new(),
            intervals: RunningStats::new(),
            recent: VecDeque::with_capacity(recent_capacity),
            recent_capacity,
            unstable_rate: 0.0,
            tally: HitTally::default(),
            last_tap_ms: None,
        }
    }

    pub fn record_hit(&mut self, judgment: &Judgment) -> ResolvedTap {
        let tap = ResolvedTap {
            index: self.log.len(),
            offset_ms: judgment.offset_ms,
            channel: judgment.channel,
            timestamp_ms: judgment.timestamp_ms,
        };
        self.log.push(tap);

        self.offsets.push(tap.offset_ms);
        self.unstable_rate = self.offsets.std_dev() * 10.0;

        if self.recent.len() == self.recent_capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(tap.offset_ms);

        if let Some(prev) = self.last_tap_ms {
            self.intervals.push(tap.timestamp_ms - prev);
        }
        self.last_tap_ms = Some(tap.timestamp_ms);

        match judgment.grade {
            Grade::Perfect => self.tally.hit300 += 1,
            Grade::Good => self.tally.hit100 += 1,
            Grade::Meh => self.tally.hit50 += 1,
        }

        tap
    }

    /// Misses only count; they carry no offset.
    pub fn record_miss(&mut self) {
        self.tally.miss += 1;
    }

    pub fn log(&self) -> &[ResolvedTap] {
        &self.log
    }

    pub fn into_log(self) -> Vec<ResolvedTap> {
        self.log
    }

    pub fn tally(&self) -> HitTally {
        self.tally
    }

    pub fn miss_count(&self) -> u32 {
        self.tally.miss
    }

    pub fn mean_offset_ms(&self) -> Millis {
        self.offsets.mean()
    }

    pub fn std_dev_ms(&self) -> Millis {
        self.offsets.std_dev()
    }

    /// `std_dev * 10`.
    pub fn unstable_rate(&self) -> f64 {
        self.unstable_rate
    }

    pub fn recent_offsets(&self) -> impl Iterator<Item = Millis> + '_ {
        self.recent.iter().copied()
    }

    pub fn live(&self) -> LiveFeedback {
        LiveFeedback {
            tap_count: self.log.len(),
            miss_count: self.tally.miss,
            mean_offset_ms: self.offsets.mean(),
            std_dev_ms: self.offsets.std_dev(),
            unstable_rate: self.unstable_rate,
            last_offset_ms: self.log.last().map(|t| t.offset_ms),
            interval_std_dev_ms: self.intervals.std_dev(),
            recent_offsets_ms: self.recent.iter().copied().collect(),
        }
    }
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new(120)
    }
}
