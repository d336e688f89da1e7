use drill_schema::Millis;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    Perfect,
    Good,
    Meh,
}

impl Grade {
    pub fn points(self) -> u32 {
        match self {
            Grade::Perfect => 300,
            Grade::Good => 100,
            Grade::Meh => 50,
        }
    }
}

pub const MAX_OD: f64 = 10.0;

/// Half-widths (ms) of the three concentric hit windows, PERFECT inside GOOD
/// inside MEH. MEH is also the miss cutoff used for eviction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitWindows {
    pub perfect_ms: Millis,
    pub good_ms: Millis,
    pub meh_ms: Millis,
}

impl HitWindows {
    /// Windows shrink as `od` grows. `od` is clamped to [0, 10] so every
    /// window stays positive.
    pub fn from_od(od: f64) -> Self {
        let od = if od.is_nan() { 0.0 } else { od.clamp(0.0, MAX_OD) };
        Self {
            perfect_ms: 80.0 - 6.0 * od,
            good_ms: 140.0 - 8.0 * od,
            meh_ms: 200.0 - 10.0 * od,
        }
    }

    pub fn fixed_preset() -> Self {
        Self {
            perfect_ms: 16.0,
            good_ms: 34.0,
            meh_ms: 50.0,
        }
    }

    /// Boundaries are inclusive: an offset exactly on a window edge gets the
    /// tighter grade. `None` means the offset is outside every window.
    pub fn grade(&self, offset_ms: Millis) -> Option<Grade> {
        let abs = offset_ms.abs();
        if abs <= self.perfect_ms {
            Some(Grade::Perfect)
        } else if abs <= self.good_ms {
            Some(Grade::Good)
        } else if abs <= self.meh_ms {
            Some(Grade::Meh)
        } else {
            None
        }
    }

    pub fn miss_cutoff_ms(&self) -> Millis {
        self.meh_ms
    }
}

impl Default for HitWindows {
    fn default() -> Self {
        Self::from_od(5.0)
    }
}
