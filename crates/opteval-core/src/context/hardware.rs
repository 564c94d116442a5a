//! Hardware descriptors carried by `pe` and `interconnect` records.

use serde::Serialize;
use std::cmp::Ordering;

/// Interconnect area per PE, used when an `interconnect` record has no area.
pub const IC_AREA_PER_PE: f64 = 0.001 * 0.001 / 10.0;

/// One processing element: frequency in Hz, relative performance, and area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeData {
    pub frequency: u64,
    pub performance: f64,
    pub area: f64,
}

impl PeData {
    pub fn new(frequency: u64, performance: f64, area: f64) -> Self {
        Self {
            frequency,
            performance,
            area,
        }
    }

    /// Operations per second, truncated to an integer.
    pub fn ops(&self) -> i64 {
        (self.frequency as f64 * self.performance) as i64
    }

    /// Total order by (ops, area), then by the raw triple.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.ops()
            .cmp(&other.ops())
            .then_with(|| self.area.total_cmp(&other.area))
            .then_with(|| self.frequency.cmp(&other.frequency))
            .then_with(|| self.performance.total_cmp(&other.performance))
    }

    /// Exact textual key: `freq:perf:area` with scientific floats.
    pub fn fingerprint(&self) -> String {
        format!("{}:{:e}:{:e}", self.frequency, self.performance, self.area)
    }
}
