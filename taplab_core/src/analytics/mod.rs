//! Post-session diagnostics over a finished tap log.

pub mod galloping;
pub mod histogram;
pub mod segments;

use drill_schema::{Channel, Millis};
use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::session::recorder::ResolvedTap;
use crate::stats::RunningStats;

pub use galloping::{assess_galloping, GallopSignals};
pub use histogram::{build_histogram, Histogram};
pub use segments::{segment_taps, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    pub count: u64,
    pub mean_ms: Millis,
    pub std_dev_ms: Millis,
}

impl From<&RunningStats> for ChannelStats {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            mean_ms: stats.mean(),
            std_dev_ms: stats.std_dev(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriftPoint {
    pub segment: usize,
    pub mean_ms: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FatiguePoint {
    pub segment: usize,
    pub std_dev_ms: Millis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionAnalytics {
    pub total_taps: usize,

    pub mean_offset_ms: Millis,
    pub std_dev_ms: Millis,
    pub unstable_rate: f64,

    /// Fractions of all taps; a zero offset counts as neither.
    pub early_ratio: f64,
    pub late_ratio: f64,

    pub left: ChannelStats,
    pub right: ChannelStats,
    /// `|mean L - mean R| + |std L - std R|`, clamped to 0..=100.
    pub imbalance: f64,

    pub histogram: Histogram,
    pub drift_curve: Vec<DriftPoint>,
    pub fatigue_curve: Vec<FatiguePoint>,

    pub galloping: GallopSignals,
    pub galloping_risk: u32,
    pub consistency_score: f64,
}

/// Stddev of the per-segment stddevs, mapped to 0..=100. Fewer than two
/// segments count as perfectly consistent.
pub fn consistency_score(fatigue: &[FatiguePoint], penalty: f64) -> f64 {
    if fatigue.len() < 2 {
        return 100.0;
    }
    let variation: RunningStats = fatigue.iter().map(|p| p.std_dev_ms).collect();
    (100.0 - variation.std_dev() * penalty).clamp(0.0, 100.0)
}

/// `None` for an empty log.
pub fn analyze_session(taps: &[ResolvedTap], config: &AnalyticsConfig) -> Option<SessionAnalytics> {
    if taps.is_empty() {
        return None;
    }

    let mut overall = RunningStats::new();
    let mut left = RunningStats::new();
    let mut right = RunningStats::new();
    let mut early = 0usize;
    let mut late = 0usize;

    for tap in taps {
        overall.push(tap.offset_ms);
        match tap.channel {
            Channel::Left => left.push(tap.offset_ms),
            Channel::Right => right.push(tap.offset_ms),
        }
        if tap.offset_ms < 0.0 {
            early += 1;
        } else if tap.offset_ms > 0.0 {
            late += 1;
        }
    }

    let total = taps.len();
    let segments = segment_taps(taps, config.segments);
    let drift_curve = segments
        .iter()
        .map(|s| DriftPoint {
            segment: s.segment,
            mean_ms: s.mean_ms,
        })
        .collect();
    let fatigue_curve: Vec<FatiguePoint> = segments
        .iter()
        .map(|s| FatiguePoint {
            segment: s.segment,
            std_dev_ms: s.std_dev_ms,
        })
        .collect();

    let imbalance = ((left.mean() - right.mean()).abs() + (left.std_dev() - right.std_dev()).abs())
        .clamp(0.0, 100.0);
    let galloping = assess_galloping(taps, &left, &right, config);
    let consistency = consistency_score(&fatigue_curve, config.consistency_penalty);

    Some(SessionAnalytics {
        total_taps: total,
        mean_offset_ms: overall.mean(),
        std_dev_ms: overall.std_dev(),
        unstable_rate: overall.std_dev() * 10.0,
        early_ratio: early as f64 / total as f64,
        late_ratio: late as f64 / total as f64,
        left: ChannelStats::from(&left),
        right: ChannelStats::from(&right),
        imbalance,
        histogram: build_histogram(taps, config.histogram_bin_ms),
        drift_curve,
        fatigue_curve,
        galloping_risk: galloping.risk,
        galloping,
        consistency_score: consistency,
    })
}

/// [`analyze_session`] with the default tuning.
pub fn analyze(taps: &[ResolvedTap]) -> Option<SessionAnalytics> {
    analyze_session(taps, &AnalyticsConfig::default())
}
