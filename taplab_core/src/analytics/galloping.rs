//! Galloping detection: a heuristic, not a classifier.
//!
//! "Galloping" is hitting one hand consistently earlier than the other while
//! alternating, which turns an even stream into a long-short rhythm. Two
//! signals feed the score:
//!
//! - magnitude bias: how far apart the left and right mean offsets are,
//!   normalised by `gallop_bias_divisor_ms` and capped at 1;
//! - interval irregularity: the share of consecutive inter-tap-interval
//!   triples `(a, b, c)` where both `|a - b|` and `|b - c|` exceed
//!   `gallop_interval_threshold_ms`, i.e. the interval keeps flipping.
//!
//! The weighted sum is scaled by a confidence factor that grows with the tap
//! count, then mapped to 0..=100. Sessions without enough taps overall or on
//! either channel score 0.

use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::session::recorder::ResolvedTap;
use crate::stats::RunningStats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GallopSignals {
    /// False when the session had too few taps to judge; everything else is 0.
    pub sufficient: bool,
    pub magnitude_bias: f64,
    pub irregularity: f64,
    pub confidence: f64,
    /// 0..=100.
    pub risk: u32,
}

pub fn interval_irregularity(taps: &[ResolvedTap], threshold_ms: f64) -> f64 {
    let intervals: Vec<f64> = taps
        .windows(2)
        .map(|pair| pair[1].timestamp_ms - pair[0].timestamp_ms)
        .collect();

    let mut triples = 0usize;
    let mut irregular = 0usize;
    for w in intervals.windows(3) {
        let (a, b, c) = (w[0], w[1], w[2]);
        triples += 1;
        if (a - b).abs() > threshold_ms && (b - c).abs() > threshold_ms {
            irregular += 1;
        }
    }

    if triples == 0 {
        0.0
    } else {
        irregular as f64 / triples as f64
    }
}

pub fn assess_galloping(
    taps: &[ResolvedTap],
    left: &RunningStats,
    right: &RunningStats,
    config: &AnalyticsConfig,
) -> GallopSignals {
    if taps.len() < config.gallop_min_taps
        || (left.count() as usize) < config.gallop_min_per_channel
        || (right.count() as usize) < config.gallop_min_per_channel
    {
        return GallopSignals::default();
    }

    let magnitude_bias =
        ((left.mean() - right.mean()).abs() / config.gallop_bias_divisor_ms).clamp(0.0, 1.0);
    let irregularity = interval_irregularity(taps, config.gallop_interval_threshold_ms);

    let combined =
        config.gallop_bias_weight * magnitude_bias + config.gallop_irregularity_weight * irregularity;
    let confidence = (taps.len() as f64 / config.gallop_confidence_taps).min(1.0);
    let risk = (combined * confidence * 100.0).min(100.0).max(0.0).round() as u32;

    GallopSignals {
        sufficient: true,
        magnitude_bias,
        irregularity,
        confidence,
        risk,
    }
}
