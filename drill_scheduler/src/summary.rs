use drill_schema::Drill;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Focus {
    Burst,
    Control,
    Endurance,
}

impl Focus {
    pub fn from_notes_per_bar(notes: usize) -> Self {
        if notes <= 5 {
            Focus::Burst
        } else if notes >= 9 {
            Focus::Endurance
        } else {
            Focus::Control
        }
    }
}

/// Human-facing description of a drill, for catalog listings and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillSummary {
    pub bpm: f64,
    pub od: f64,
    pub focus: Focus,
    pub subdivision: String,
    pub time_sig: String,
    /// Sum of note slots over all bar templates.
    pub notes_per_bar: usize,
    pub total_duration_sec: f64,
    pub duration: String,
}

pub fn summarize(drill: &Drill) -> DrillSummary {
    let notes_per_bar: usize = drill.bars.iter().map(|bar| bar.notes.len()).sum();

    let total_duration_sec = if drill.bpm > 0.0 {
        drill.beat_length_ms() * drill.time_sig.beats_per_bar as f64 * drill.duration_bars as f64
            / 1000.0
    } else {
        0.0
    };

    DrillSummary {
        bpm: drill.bpm,
        od: drill.od,
        focus: Focus::from_notes_per_bar(notes_per_bar),
        subdivision: format!("{}th Notes", drill.resolution.saturating_mul(4)),
        time_sig: format!("{}/{}", drill.time_sig.beats_per_bar, drill.time_sig.beat_unit),
        notes_per_bar,
        total_duration_sec,
        duration: format!(
            "{} bars, {}s",
            drill.duration_bars,
            total_duration_sec.round() as u64
        ),
    }
}
