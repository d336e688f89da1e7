use serde::{Deserialize, Serialize};

/// Grade counts for one session. Misses include evictions and channel mismatches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitTally {
    pub hit300: u32,
    pub hit100: u32,
    pub hit50: u32,
    pub miss: u32,
}

impl HitTally {
    pub fn total(&self) -> u32 {
        self.hit300 + self.hit100 + self.hit50 + self.miss
    }

    pub fn hits(&self) -> u32 {
        self.hit300 + self.hit100 + self.hit50
    }

    /// Weighted accuracy in [0, 1]; 0 for an empty tally.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let points = 300 * self.hit300 as u64 + 100 * self.hit100 as u64 + 50 * self.hit50 as u64;
        points as f64 / (300 * total as u64) as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    D,
    C,
    B,
    A,
    S,
    SS,
}

impl LetterGrade {
    pub fn from_accuracy(acc: f64) -> Self {
        if acc >= 1.0 {
            LetterGrade::SS
        } else if acc >= 0.95 {
            LetterGrade::S
        } else if acc >= 0.90 {
            LetterGrade::A
        } else if acc >= 0.80 {
            LetterGrade::B
        } else if acc >= 0.70 {
            LetterGrade::C
        } else {
            LetterGrade::D
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LetterGrade::SS => "SS",
            LetterGrade::S => "S",
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
        }
    }
}
