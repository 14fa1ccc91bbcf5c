//! Philtrum length against chin length.
//!
//! Both are vertical spans between horizontal landmark lines: nose base to
//! upper lip for the philtrum, lower lip to chin tip for the chin.

use super::{nearest_ideal, Measurement, MetricKind, NamedRatio};
use crate::geometry::{round_to, safe_ratio};
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhiltrumChin {
    pub philtrum_length: f64,
    pub chin_length: f64,
    /// Chin length over philtrum length.
    pub ratio: f64,
    pub closest_ideal: String,
    pub target_ratio: f64,
    pub difference: f64,
}

impl Measurement for PhiltrumChin {
    const KIND: MetricKind = MetricKind::PhiltrumChin;

    fn primary_value(&self) -> f64 {
        self.difference
    }
}

pub fn extract(n: &NormalizedLandmarkSet, ideals: &[NamedRatio]) -> PhiltrumChin {
    let philtrum_length = (n.at(index::UPPER_LIP_TOP).y - n.at(index::NOSE_BOTTOM).y).max(0.0);
    let chin_length = (n.at(index::CHIN_TIP).y - n.at(index::LOWER_LIP_BOTTOM).y).max(0.0);
    let ratio = safe_ratio(chin_length, philtrum_length, 0.0);

    let (closest_ideal, target_ratio, difference) = nearest_ideal(ratio, ideals);

    PhiltrumChin {
        philtrum_length: round_to(philtrum_length, 3),
        chin_length: round_to(chin_length, 3),
        ratio: round_to(ratio, 3),
        closest_ideal,
        target_ratio,
        difference: round_to(difference, 3),
    }
}
