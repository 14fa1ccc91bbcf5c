//! V-line: jaw angle at the gonion-equivalent landmark on each side.
//!
//! The angle opens between the ray up to the cheekbone and the ray down to
//! the chin tip. A smaller angle reads as a sharper jawline.

use super::{Measurement, MetricKind};
use crate::geometry::{angle_at, round_to};
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

const SHARP_DEGREES: f64 = 125.0;
const MODERATE_DEGREES: f64 = 140.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sharpness {
    Sharp,
    Moderate,
    Soft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VLine {
    pub left_jaw_angle: f64,
    pub right_jaw_angle: f64,
    /// Mean of both sides, in degrees.
    pub jaw_angle: f64,
    pub sharpness: Sharpness,
}

impl Measurement for VLine {
    const KIND: MetricKind = MetricKind::Vline;

    fn primary_value(&self) -> f64 {
        self.jaw_angle
    }
}

pub fn extract(n: &NormalizedLandmarkSet) -> VLine {
    let chin = n.at(index::CHIN_TIP).planar();
    let side = |jaw: usize, cheek: usize| {
        angle_at(n.at(jaw).planar(), n.at(cheek).planar(), chin)
    };

    let left = side(index::LEFT_JAW, index::LEFT_CHEEK);
    let right = side(index::RIGHT_JAW, index::RIGHT_CHEEK);
    let jaw_angle = (left + right) / 2.0;

    let sharpness = if jaw_angle < SHARP_DEGREES {
        Sharpness::Sharp
    } else if jaw_angle < MODERATE_DEGREES {
        Sharpness::Moderate
    } else {
        Sharpness::Soft
    };

    VLine {
        left_jaw_angle: round_to(left, 1),
        right_jaw_angle: round_to(right, 1),
        jaw_angle: round_to(jaw_angle, 1),
        sharpness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures;

    #[test]
    fn test_reference_jaw() {
        let v = extract(&fixtures::reference());
        assert_eq!(v.left_jaw_angle, v.right_jaw_angle);
        assert!((v.jaw_angle - 134.5).abs() < 0.3, "jaw angle = {}", v.jaw_angle);
        assert_eq!(v.sharpness, Sharpness::Moderate);
    }

    #[test]
    fn test_inward_jaw_opens_angle() {
        let mut n = fixtures::reference();
        n.points[index::LEFT_JAW].x += 0.15;
        n.points[index::RIGHT_JAW].x -= 0.15;
        let base = extract(&fixtures::reference()).jaw_angle;
        let opened = extract(&n);
        assert!(opened.jaw_angle > base, "{} <= {base}", opened.jaw_angle);
        assert_eq!(opened.sharpness, Sharpness::Soft);
    }
}
