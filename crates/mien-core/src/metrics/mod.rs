//! Geometric metric extractors.
//!
//! Each submodule exposes a pure `extract` function from a
//! [`NormalizedLandmarkSet`](crate::normalize::NormalizedLandmarkSet) to a raw
//! measurement struct. Extractors never fail: numeric edge cases are guarded
//! locally and produce best-effort values.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod contour;
pub mod dental;
pub mod eline;
pub mod harmony;
pub mod nasolabial;
pub mod philtrum;
pub mod pose;
pub mod proportions;
pub mod symmetry;
pub mod vline;

pub use contour::FaceContour;
pub use dental::DentalProtrusion;
pub use eline::ELine;
pub use harmony::FacialHarmony;
pub use nasolabial::NasolabialAngle;
pub use philtrum::PhiltrumChin;
pub use pose::FaceAngle;
pub use proportions::Proportions;
pub use symmetry::Symmetry;
pub use vline::VLine;

/// Mean adult inter-pupillary distance, used to quote normalized distances
/// in approximate millimetres.
pub const MEAN_IPD_MM: f64 = 63.0;

/// The ten metric groups, in canonical report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    FaceAngle,
    FaceContour,
    Eline,
    Proportions,
    PhiltrumChin,
    NasolabialAngle,
    Vline,
    Symmetry,
    DentalProtrusion,
    FacialHarmony,
}

impl MetricKind {
    pub const ALL: [MetricKind; 10] = [
        MetricKind::FaceAngle,
        MetricKind::FaceContour,
        MetricKind::Eline,
        MetricKind::Proportions,
        MetricKind::PhiltrumChin,
        MetricKind::NasolabialAngle,
        MetricKind::Vline,
        MetricKind::Symmetry,
        MetricKind::DentalProtrusion,
        MetricKind::FacialHarmony,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::FaceAngle => "face_angle",
            MetricKind::FaceContour => "face_contour",
            MetricKind::Eline => "eline",
            MetricKind::Proportions => "proportions",
            MetricKind::PhiltrumChin => "philtrum_chin",
            MetricKind::NasolabialAngle => "nasolabial_angle",
            MetricKind::Vline => "vline",
            MetricKind::Symmetry => "symmetry",
            MetricKind::DentalProtrusion => "dental_protrusion",
            MetricKind::FacialHarmony => "facial_harmony",
        }
    }

    /// Metrics whose geometry degrades when the head is turned.
    pub fn is_pose_sensitive(&self) -> bool {
        matches!(
            self,
            MetricKind::FaceAngle | MetricKind::Symmetry | MetricKind::Proportions
        )
    }

    /// Metrics measured in the profile plane, which fall back to an
    /// image-plane estimate without depth.
    pub fn uses_depth(&self) -> bool {
        matches!(
            self,
            MetricKind::Eline | MetricKind::NasolabialAngle | MetricKind::DentalProtrusion
        )
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw measurement produced by one extractor.
pub trait Measurement {
    const KIND: MetricKind;

    /// The value the metric's score curve is applied to.
    fn primary_value(&self) -> f64;

    /// True when the extractor had to fall back to a weaker estimate.
    fn low_confidence(&self) -> bool {
        false
    }

    /// Store the curve score in any score field the measurement reports
    /// itself, so the two never disagree.
    fn record_score(&mut self, _score: f64) {}
}

/// A named target ratio, e.g. the golden ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRatio {
    pub name: String,
    pub value: f64,
}

/// Pick the ideal nearest to `value`. Ties go to the earlier entry.
///
/// Returns `(name, target, absolute difference)`; an empty table yields an
/// unnamed zero target.
pub(crate) fn nearest_ideal(value: f64, ideals: &[NamedRatio]) -> (String, f64, f64) {
    let mut best: Option<(&NamedRatio, f64)> = None;
    for ideal in ideals {
        let diff = (value - ideal.value).abs();
        if best.map_or(true, |(_, d)| diff < d) {
            best = Some((ideal, diff));
        }
    }
    match best {
        Some((ideal, diff)) => (ideal.name.clone(), ideal.value, diff),
        None => (String::new(), 0.0, value.abs()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ideals() -> Vec<NamedRatio> {
        vec![
            NamedRatio { name: "golden".into(), value: 1.618 },
            NamedRatio { name: "silver".into(), value: 1.414 },
        ]
    }

    #[test]
    fn test_nearest_ideal_picks_closest() {
        let (name, target, diff) = nearest_ideal(1.45, &ideals());
        assert_eq!(name, "silver");
        assert_eq!(target, 1.414);
        assert!((diff - 0.036).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_ideal_empty_table() {
        let (name, target, diff) = nearest_ideal(2.0, &[]);
        assert!(name.is_empty());
        assert_eq!(target, 0.0);
        assert_eq!(diff, 2.0);
    }

    #[test]
    fn test_depth_metrics_are_profile_metrics() {
        let depth: Vec<_> = MetricKind::ALL.into_iter().filter(MetricKind::uses_depth).collect();
        assert_eq!(
            depth,
            [MetricKind::Eline, MetricKind::NasolabialAngle, MetricKind::DentalProtrusion]
        );
        assert!(!MetricKind::FaceAngle.uses_depth());
    }

    #[test]
    fn test_kind_names_match_serde() {
        for kind in MetricKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
