//! Face contour: oval area and perimeter, width/height, jaw-to-cheekbone ratio.

use super::{Measurement, MetricKind};
use crate::geometry::{polygon_area, polygon_perimeter, round_to, safe_ratio};
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

/// Oval area (IPD²) at or below which the small-face score is 100.
const SMALL_FACE_AREA_IDEAL: f64 = 5.8;
/// Oval area at or above which the small-face score is 0.
const SMALL_FACE_AREA_LIMIT: f64 = 8.0;

/// All lengths are in inter-pupillary units, areas in IPD².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceContour {
    pub face_area: f64,
    pub face_perimeter: f64,
    pub face_width: f64,
    pub face_height: f64,
    pub cheekbone_width: f64,
    pub jaw_width: f64,
    pub jaw_cheek_ratio: f64,
    /// 100 for an oval small relative to the eyes, falling linearly to 0.
    pub small_face_score: f64,
}

impl Measurement for FaceContour {
    const KIND: MetricKind = MetricKind::FaceContour;

    fn primary_value(&self) -> f64 {
        self.jaw_cheek_ratio
    }
}

pub fn extract(n: &NormalizedLandmarkSet) -> FaceContour {
    let oval = n.planar(&index::FACE_OVAL);
    let face_area = polygon_area(&oval);
    let face_perimeter = polygon_perimeter(&oval);

    let (min_x, max_x) = oval
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));
    let face_width = if max_x >= min_x { max_x - min_x } else { 0.0 };
    let face_height = n.at(index::FOREHEAD_CENTER).distance(&n.at(index::CHIN_TIP));

    let cheekbone_width = n.at(index::LEFT_CHEEK).distance(&n.at(index::RIGHT_CHEEK));
    let jaw_width = n.at(index::LEFT_JAW).distance(&n.at(index::RIGHT_JAW));
    let jaw_cheek_ratio = safe_ratio(jaw_width, cheekbone_width, 0.0);

    let small_face_score = (100.0
        * (SMALL_FACE_AREA_LIMIT - face_area)
        / (SMALL_FACE_AREA_LIMIT - SMALL_FACE_AREA_IDEAL))
        .clamp(0.0, 100.0);

    FaceContour {
        face_area: round_to(face_area, 3),
        face_perimeter: round_to(face_perimeter, 3),
        face_width: round_to(face_width, 3),
        face_height: round_to(face_height, 3),
        cheekbone_width: round_to(cheekbone_width, 3),
        jaw_width: round_to(jaw_width, 3),
        jaw_cheek_ratio: round_to(jaw_cheek_ratio, 3),
        small_face_score: round_to(small_face_score, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures;

    #[test]
    fn test_reference_contour() {
        let c = extract(&fixtures::reference());
        assert!((c.cheekbone_width - 2.16).abs() < 1e-9);
        assert!((c.jaw_width - 1.7).abs() < 1e-9);
        assert!((c.jaw_cheek_ratio - 0.787).abs() < 1e-9);
        assert!((c.face_height - 3.35).abs() < 1e-9);
        // Close to the ellipse the oval was sampled from (π·1.08·1.675 ≈ 5.68).
        assert!(c.face_area > 5.0 && c.face_area < 6.0, "area = {}", c.face_area);
        assert!(c.face_perimeter > 8.0 && c.face_perimeter < 10.0);
        assert_eq!(c.small_face_score, 100.0);
    }

    #[test]
    fn test_collapsed_cheeks_do_not_divide_by_zero() {
        let mut n = fixtures::reference();
        n.points[index::RIGHT_CHEEK] = n.at(index::LEFT_CHEEK);
        let c = extract(&n);
        assert_eq!(c.jaw_cheek_ratio, 0.0);
    }

    #[test]
    fn test_wider_face_lowers_small_face_score() {
        let mut n = fixtures::reference();
        for &i in &index::FACE_OVAL {
            n.points[i].x *= 1.4;
        }
        let c = extract(&n);
        assert!(c.small_face_score < 100.0);
    }
}
