use drill_schema::{Drill, Millis};
use serde::Serialize;

use crate::ScheduleIssue;

/// Tempo-derived lengths for one drill. All values in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeMap {
    pub beat_ms: Millis,
    pub bar_ms: Millis,
    pub cell_ms: Millis,
    pub slots_per_bar: u32,
}

impl TimeMap {
    pub fn bar_start(&self, session_start_ms: Millis, bar_index: u32) -> Millis {
        session_start_ms + bar_index as f64 * self.bar_ms
    }

    pub fn instant(&self, bar_start_ms: Millis, position: u32) -> Millis {
        bar_start_ms + position as f64 * self.cell_ms
    }

    pub fn total_ms(&self, duration_bars: u32) -> Millis {
        duration_bars as f64 * self.bar_ms
    }
}

pub(crate) fn pass1_time_map(drill: &Drill) -> Result<TimeMap, ScheduleIssue> {
    if !(drill.bpm.is_finite() && drill.bpm > 0.0) {
        return Err(ScheduleIssue::new(
            "E3003",
            format!("bpm must be > 0 (bpm={})", drill.bpm),
        ));
    }
    if drill.resolution < 1 {
        return Err(ScheduleIssue::new("E3004", "resolution must be >= 1"));
    }
    let beats_per_bar = drill.time_sig.beats_per_bar;
    if beats_per_bar < 1 {
        return Err(ScheduleIssue::new("E3006", "beats_per_bar must be >= 1"));
    }

    let beat_ms = 60_000.0 / drill.bpm;
    let cell_ms = beat_ms / drill.resolution as f64;
    if !(cell_ms > 0.0) {
        return Err(ScheduleIssue::new(
            "E3007",
            "grid cell rounded to 0ms; bpm/resolution too extreme",
        ));
    }

    Ok(TimeMap {
        beat_ms,
        bar_ms: beat_ms * beats_per_bar as f64,
        cell_ms,
        slots_per_bar: drill.grid_slots_per_bar(),
    })
}
