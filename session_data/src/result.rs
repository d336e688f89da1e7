use serde::{Deserialize, Serialize};

use crate::score::{HitTally, LetterGrade};

/// Flat end-of-session payload handed to the persistence collaborator.
///
/// Field names follow the storage payload (`hit300`, `missCount`, ...); the
/// core never reads these back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user_id: String,
    pub drill_id: String,
    pub bpm: f64,
    pub hit300: u32,
    pub hit100: u32,
    pub hit50: u32,
    pub miss_count: u32,
    pub mean_offset: f64,
    pub unstable_rate: f64,
}

impl SessionRecord {
    pub fn new(
        user_id: impl Into<String>,
        drill_id: impl Into<String>,
        bpm: f64,
        tally: HitTally,
        mean_offset: f64,
        unstable_rate: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            drill_id: drill_id.into(),
            bpm,
            hit300: tally.hit300,
            hit100: tally.hit100,
            hit50: tally.hit50,
            miss_count: tally.miss,
            mean_offset,
            unstable_rate,
        }
    }

    pub fn tally(&self) -> HitTally {
        HitTally {
            hit300: self.hit300,
            hit100: self.hit100,
            hit50: self.hit50,
            miss: self.miss_count,
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.tally().accuracy()
    }

    pub fn letter_grade(&self) -> LetterGrade {
        LetterGrade::from_accuracy(self.accuracy())
    }
}
