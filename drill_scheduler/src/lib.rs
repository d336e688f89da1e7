//! Expands a declarative drill into the absolute timeline of expected taps.
//!
//! Scheduling never fails: malformed parts of a drill are reported as
//! [`ScheduleIssue`]s and skipped, and whatever remains valid is scheduled.

mod error;
mod generate;
mod summary;
mod time_map;

#[cfg(test)]
mod tests;

use drill_schema::{Channel, Drill, Millis};
use serde::Serialize;
use tracing::{debug, warn};

pub use error::{IssueKind, ScheduleIssue};
pub use summary::{summarize, DrillSummary, Focus};
pub use time_map::TimeMap;

use generate::{pass2_generate, validate_template};
use time_map::pass1_time_map;

/// An absolute instant at which a tap is expected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedInstant {
    /// Position in the schedule (0-based, ascending with time).
    pub index: usize,
    pub time_ms: Millis,
    /// Required input channel; `None` accepts either.
    pub channel: Option<Channel>,
    pub bar_index: u32,
    pub position: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub instants: Vec<ExpectedInstant>,
    pub issues: Vec<ScheduleIssue>,
    /// `None` when the drill's tempo or meter is unusable.
    pub time_map: Option<TimeMap>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    pub fn first_time_ms(&self) -> Option<Millis> {
        self.instants.first().map(|i| i.time_ms)
    }

    pub fn last_time_ms(&self) -> Option<Millis> {
        self.instants.last().map(|i| i.time_ms)
    }

    pub fn grid_cell_ms(&self) -> Option<Millis> {
        self.time_map.map(|t| t.cell_ms)
    }
}

/// Builds the expected-instant timeline for `drill` starting at `session_start_ms`.
///
/// Bar templates are cycled by modulo over `duration_bars`. The result is
/// ordered by time; out-of-range and non-ascending grid positions are dropped.
pub fn schedule(drill: &Drill, session_start_ms: Millis) -> Schedule {
    let mut issues = Vec::new();

    let time_map = match pass1_time_map(drill) {
        Ok(t) => t,
        Err(issue) => {
            warn!(drill = %drill.id, "{issue}; nothing scheduled");
            return Schedule {
                instants: Vec::new(),
                issues: vec![issue],
                time_map: None,
            };
        }
    };

    if drill.bars.is_empty() {
        issues.push(ScheduleIssue::new("E4003", "drill has no bar templates"));
    }
    if drill.duration_bars == 0 {
        issues.push(ScheduleIssue::new("E4004", "drill has zero duration"));
    }

    let templates: Vec<_> = drill
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| validate_template(i, bar, time_map.slots_per_bar, &mut issues))
        .collect();

    for issue in &issues {
        if issue.kind == IssueKind::Validation {
            warn!(drill = %drill.id, "{issue}");
        }
    }

    let instants = pass2_generate(drill, &time_map, &templates, session_start_ms);
    debug!(
        drill = %drill.id,
        instants = instants.len(),
        issues = issues.len(),
        "schedule built"
    );

    Schedule {
        instants,
        issues,
        time_map: Some(time_map),
    }
}
