//! Bilateral symmetry about the vertical facial midline.
//!
//! For each left/right landmark pair the horizontal mismatch of their
//! distances to the midline and their vertical offset combine into a pair
//! deviation; the RMS over all pairs is the asymmetry level.

use super::{Measurement, MetricKind};
use crate::geometry::round_to;
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

/// Symmetry points lost per percent of asymmetry.
const POINTS_PER_PERCENT: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symmetry {
    /// 100 for a mirror-identical face. Replaced by the configured curve's
    /// score on evaluation.
    pub symmetry_score: f64,
    /// RMS pair deviation as a percentage of the inter-pupillary distance.
    pub asymmetry_level: f64,
    /// Largest single pair deviation, same unit.
    pub worst_pair_deviation: f64,
}

impl Measurement for Symmetry {
    const KIND: MetricKind = MetricKind::Symmetry;

    fn primary_value(&self) -> f64 {
        self.asymmetry_level
    }

    fn record_score(&mut self, score: f64) {
        self.symmetry_score = score;
    }
}

pub fn extract(n: &NormalizedLandmarkSet) -> Symmetry {
    let midline_x = index::MIDLINE.iter().map(|&i| n.at(i).x).sum::<f64>() / index::MIDLINE.len() as f64;

    let deviations: Vec<f64> = index::BILATERAL_PAIRS
        .iter()
        .map(|&(l, r)| {
            let (left, right) = (n.at(l), n.at(r));
            let horizontal = ((left.x - midline_x) + (right.x - midline_x)).abs();
            let vertical = (left.y - right.y).abs();
            (horizontal * horizontal + vertical * vertical).sqrt()
        })
        .collect();

    let rms = (deviations.iter().map(|d| d * d).sum::<f64>() / deviations.len() as f64).sqrt();
    let worst = deviations.iter().copied().fold(0.0, f64::max);

    let asymmetry_level = round_to(rms * 100.0, 2);
    let symmetry_score = (100.0 - asymmetry_level * POINTS_PER_PERCENT).clamp(0.0, 100.0);

    Symmetry {
        symmetry_score: round_to(symmetry_score, 1),
        asymmetry_level,
        worst_pair_deviation: round_to(worst * 100.0, 2),
    }
}
