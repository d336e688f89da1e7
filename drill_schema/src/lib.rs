use serde::{Deserialize, Serialize};

/// Wall-clock milliseconds. Fractional values are meaningful (taps carry
/// sub-millisecond precision from the clock source).
pub type Millis = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub fn other(self) -> Self {
        match self {
            Channel::Left => Channel::Right,
            Channel::Right => Channel::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Left => "left",
            Channel::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats_per_bar: u32,
    /// 4 = quarter note base. Informational only; the beat length is always
    /// derived from bpm.
    #[serde(default = "default_beat_unit")]
    pub beat_unit: u32,
}

fn default_beat_unit() -> u32 {
    4
}

/// A note slot inside a bar template.
///
/// Plain positions (`3`) accept either channel. Tagged positions
/// (`{"position": 3, "channel": "left"}`) require the given channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BarNote {
    Plain(u32),
    Tagged { position: u32, channel: Channel },
}

impl BarNote {
    pub fn position(&self) -> u32 {
        match self {
            BarNote::Plain(position) | BarNote::Tagged { position, .. } => *position,
        }
    }

    pub fn channel(&self) -> Option<Channel> {
        match self {
            BarNote::Plain(_) => None,
            BarNote::Tagged { channel, .. } => Some(*channel),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicalBar {
    /// Grid positions inside the bar, ascending.
    pub notes: Vec<BarNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub bpm: f64,
    /// Overall difficulty in [0, 10]; drives the hit windows.
    pub od: f64,
    pub duration_bars: u32,
    pub time_sig: TimeSignature,
    /// Grid subdivisions per beat: 1 = quarter, 2 = 8th, 4 = 16th, 8 = 32nd.
    pub resolution: u32,
    pub bars: Vec<MusicalBar>,
}

impl Drill {
    pub fn grid_slots_per_bar(&self) -> u32 {
        self.time_sig.beats_per_bar.saturating_mul(self.resolution)
    }

    pub fn beat_length_ms(&self) -> Millis {
        60_000.0 / self.bpm
    }

    pub fn grid_cell_ms(&self) -> Millis {
        self.beat_length_ms() / self.resolution as f64
    }
}
