use std::collections::BTreeMap;

use drill_schema::Millis;
use serde::Serialize;

use crate::session::recorder::ResolvedTap;

/// Offset counts keyed by bucket centre (ms). Only non-empty buckets appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bin_ms: u32,
    pub counts: BTreeMap<i64, u32>,
}

impl Histogram {
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn get(&self, bucket_ms: i64) -> u32 {
        self.counts.get(&bucket_ms).copied().unwrap_or(0)
    }
}

/// Halves round towards +inf, so -2.5 ms in 5 ms bins lands in bucket 0.
pub fn bucket_of(offset_ms: Millis, bin_ms: u32) -> i64 {
    let bin = bin_ms.max(1) as f64;
    (offset_ms / bin + 0.5).floor() as i64 * bin_ms.max(1) as i64
}

pub fn build_histogram(taps: &[ResolvedTap], bin_ms: u32) -> Histogram {
    let mut counts = BTreeMap::new();
    for tap in taps {
        *counts.entry(bucket_of(tap.offset_ms, bin_ms)).or_insert(0) += 1;
    }
    Histogram {
        bin_ms: bin_ms.max(1),
        counts,
    }
}
