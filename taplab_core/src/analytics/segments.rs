use drill_schema::Millis;
use serde::Serialize;

use crate::session::recorder::ResolvedTap;
use crate::stats::RunningStats;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub segment: usize,
    pub count: usize,
    pub mean_ms: Millis,
    pub std_dev_ms: Millis,
}

/// Splits the log into `segments` contiguous chunks by position.
///
/// Every chunk but the last holds `floor(total / segments)` taps; the last one
/// takes the remainder. Empty chunks (fewer taps than segments) are skipped,
/// so indices may have gaps.
pub fn segment_taps(taps: &[ResolvedTap], segments: usize) -> Vec<Segment> {
    let segments = segments.max(1);
    let size = taps.len() / segments;
    let mut result = Vec::with_capacity(segments);

    for i in 0..segments {
        let start = i * size;
        let end = if i == segments - 1 { taps.len() } else { (i + 1) * size };
        let slice = &taps[start..end];
        if slice.is_empty() {
            continue;
        }

        let stats: RunningStats = slice.iter().map(|t| t.offset_ms).collect();
        result.push(Segment {
            segment: i,
            count: slice.len(),
            mean_ms: stats.mean(),
            std_dev_ms: stats.std_dev(),
        });
    }

    result
}
