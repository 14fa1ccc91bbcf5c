//! Head pose (face angle) estimate from horizontal asymmetry.
//!
//! The nose tip sits halfway between the cheeks on a frontal face; its
//! relative position along the cheek-to-cheek span gives a yaw estimate.

use super::{Measurement, MetricKind};
use crate::geometry::{round_to, EPSILON};
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

/// Half-width of the ratio band around 0.5 treated as frontal.
const FRONTAL_BAND: f64 = 0.1;
/// Ratios beyond 0.5 ± this are a clear turn rather than an oblique view.
const TURNED_BAND: f64 = 0.2;

/// Image-side direction the nose points towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Frontal,
    TurnedLeft,
    TurnedRight,
    Oblique,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceAngle {
    pub orientation: Orientation,
    /// Nose-to-left-cheek span over cheek-to-cheek span; 0.5 is frontal.
    pub ratio: f64,
    pub yaw_degrees: f64,
    /// In-plane tilt removed during normalization.
    pub roll_degrees: f64,
    /// Frontal confidence in [0, 1].
    pub confidence: f64,
    pub suitable_for_analysis: bool,
}

impl Measurement for FaceAngle {
    const KIND: MetricKind = MetricKind::FaceAngle;

    fn primary_value(&self) -> f64 {
        self.ratio
    }

    fn low_confidence(&self) -> bool {
        !self.suitable_for_analysis
    }
}

pub fn extract(n: &NormalizedLandmarkSet, min_confidence: f64) -> FaceAngle {
    let nose = n.at(index::NOSE_TIP);
    let left = n.at(index::LEFT_CHEEK);
    let right = n.at(index::RIGHT_CHEEK);

    let left_dist = (nose.x - left.x).abs();
    let right_dist = (nose.x - right.x).abs();
    let roll_degrees = round_to(n.roll_degrees, 2);

    if left_dist + right_dist < EPSILON {
        return FaceAngle {
            orientation: Orientation::Unknown,
            ratio: 0.5,
            yaw_degrees: 0.0,
            roll_degrees,
            confidence: 0.0,
            suitable_for_analysis: false,
        };
    }

    let ratio = left_dist / (left_dist + right_dist);
    let offset = ratio - 0.5;

    let orientation = if offset.abs() <= FRONTAL_BAND {
        Orientation::Frontal
    } else if offset < -TURNED_BAND {
        Orientation::TurnedLeft
    } else if offset > TURNED_BAND {
        Orientation::TurnedRight
    } else {
        Orientation::Oblique
    };

    let confidence = (1.0 - offset.abs() * 2.0).clamp(0.0, 1.0);
    let yaw_degrees = (offset * 2.0).clamp(-1.0, 1.0).asin().to_degrees();

    FaceAngle {
        orientation,
        ratio: round_to(ratio, 3),
        yaw_degrees: round_to(yaw_degrees, 1),
        roll_degrees,
        confidence: round_to(confidence, 2),
        suitable_for_analysis: confidence >= min_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures;

    #[test]
    fn test_reference_is_frontal() {
        let angle = extract(&fixtures::reference(), 0.6);
        assert_eq!(angle.orientation, Orientation::Frontal);
        assert_eq!(angle.ratio, 0.5);
        assert_eq!(angle.yaw_degrees, 0.0);
        assert_eq!(angle.confidence, 1.0);
        assert!(angle.suitable_for_analysis);
    }

    #[test]
    fn test_turned_nose_lowers_confidence() {
        let mut n = fixtures::reference();
        // Shift the nose tip most of the way towards the left cheek.
        n.points[index::NOSE_TIP].x = n.at(index::LEFT_CHEEK).x * 0.7;
        let angle = extract(&n, 0.6);
        assert!(angle.ratio < 0.3, "ratio = {}", angle.ratio);
        assert_eq!(angle.orientation, Orientation::TurnedLeft);
        assert!(!angle.suitable_for_analysis);
        assert!(angle.yaw_degrees < 0.0);
        assert!(angle.low_confidence());
    }

    #[test]
    fn test_collapsed_cheeks_are_unknown() {
        let mut n = fixtures::reference();
        let nose = n.at(index::NOSE_TIP);
        n.points[index::LEFT_CHEEK] = nose;
        n.points[index::RIGHT_CHEEK] = nose;
        let angle = extract(&n, 0.6);
        assert_eq!(angle.orientation, Orientation::Unknown);
        assert!(!angle.suitable_for_analysis);
    }
}
