//! Landmark normalization via a similarity transform.
//!
//! Maps a face into a canonical frame: the nasal bridge at the origin, the
//! inter-pupillary axis horizontal, and the inter-pupillary distance equal to
//! [`CANONICAL_IPD`]. Every distance an extractor measures is therefore in
//! IPD units and independent of zoom, in-plane tilt and position.

use crate::error::AnalysisError;
use crate::geometry::Point;
use crate::landmarks::{index, LandmarkSet};

/// Inter-pupillary distance in normalized space.
pub const CANONICAL_IPD: f64 = 1.0;

/// Landmarks in the canonical frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLandmarkSet {
    pub points: Vec<Point>,
    /// Whether the detector supplied depth for every point.
    pub has_depth: bool,
    /// Inter-pupillary distance of the input, in pixels.
    pub interpupillary_px: f64,
    /// In-plane tilt removed by the rotation step, in degrees.
    pub roll_degrees: f64,
}

impl NormalizedLandmarkSet {
    /// Point by detector index. Callers only pass indices from [`index`],
    /// which the validated length guarantees are present.
    pub fn at(&self, i: usize) -> Point {
        self.points[i]
    }

    /// Several points projected onto the image plane.
    pub fn planar(&self, indices: &[usize]) -> Vec<(f64, f64)> {
        indices.iter().map(|&i| self.points[i].planar()).collect()
    }
}

/// Estimate the 4-DOF similarity transform (translation, rotation, uniform
/// scale) from the anchor and eye-centre landmarks.
///
/// Returns `(anchor, cos, sin, ipd, roll_degrees)`: subtract the anchor,
/// rotate by the angle whose cosine/sine are given, then divide by `ipd`.
fn estimate_transform(points: &[Point]) -> (Point, f64, f64, f64, f64) {
    let anchor = points[index::NASAL_BRIDGE];
    let left = points[index::LEFT_EYE_CENTER];
    let right = points[index::RIGHT_EYE_CENTER];

    let dx = right.x - left.x;
    let dy = right.y - left.y;
    let ipd = (dx * dx + dy * dy).sqrt();

    // Rotate by -theta so the eye axis becomes horizontal.
    let theta = dy.atan2(dx);
    let (sin, cos) = (-theta).sin_cos();

    (anchor, cos, sin, ipd, theta.to_degrees())
}

/// Translate, rotate and scale a landmark set into the canonical frame.
///
/// Fails with `InvalidLandmark` when the set breaks the structural contract
/// and with `DegenerateGeometry` when the inter-pupillary distance is below
/// `min_interpupillary_px`.
pub fn normalize(
    landmarks: &LandmarkSet,
    min_interpupillary_px: f64,
) -> Result<NormalizedLandmarkSet, AnalysisError> {
    let pixels = landmarks.to_pixels()?;
    let (anchor, cos, sin, ipd, roll_degrees) = estimate_transform(&pixels.points);

    if !ipd.is_finite() {
        return Err(AnalysisError::degenerate(
            "interpupillary_distance",
            "distance overflows; coordinates are out of range",
        ));
    }
    if !(ipd >= min_interpupillary_px) || ipd <= 0.0 {
        return Err(AnalysisError::degenerate(
            "interpupillary_distance",
            format!("{ipd:.2}px is below the {min_interpupillary_px:.2}px minimum"),
        ));
    }

    let scale = CANONICAL_IPD / ipd;
    let points = pixels
        .points
        .iter()
        .map(|p| {
            let x = p.x - anchor.x;
            let y = p.y - anchor.y;
            Point::new(
                (cos * x - sin * y) * scale,
                (sin * x + cos * y) * scale,
                (p.z - anchor.z) * scale,
            )
        })
        .collect();

    tracing::debug!(
        interpupillary_px = ipd,
        roll_degrees,
        has_depth = pixels.has_depth,
        "landmarks normalized"
    );

    Ok(NormalizedLandmarkSet {
        points,
        has_depth: pixels.has_depth,
        interpupillary_px: ipd,
        roll_degrees,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::LandmarkPoint;
    use crate::reference::reference_face;

    const MIN_IPD: f64 = 8.0;

    /// Apply a similarity transform to every input point.
    fn transformed(set: &LandmarkSet, scale: f64, degrees: f64, shift: (f64, f64)) -> LandmarkSet {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let mut out = set.clone();
        for p in &mut out.points {
            let (x, y) = (p.x, p.y);
            *p = LandmarkPoint::new(
                (cos * x - sin * y) * scale + shift.0,
                (sin * x + cos * y) * scale + shift.1,
                p.z.map(|z| z * scale),
            );
        }
        out.image_width = (set.image_width as f64 * scale * 2.0) as u32;
        out.image_height = (set.image_height as f64 * scale * 2.0) as u32;
        out
    }

    fn assert_same(a: &NormalizedLandmarkSet, b: &NormalizedLandmarkSet) {
        for (i, (p, q)) in a.points.iter().zip(b.points.iter()).enumerate() {
            assert!(
                (p.x - q.x).abs() < 1e-9 && (p.y - q.y).abs() < 1e-9 && (p.z - q.z).abs() < 1e-9,
                "point {i} differs: {p:?} vs {q:?}"
            );
        }
    }

    #[test]
    fn test_canonical_frame() {
        let n = normalize(&reference_face(), MIN_IPD).unwrap();

        let anchor = n.at(index::NASAL_BRIDGE);
        assert!(anchor.x.abs() < 1e-12 && anchor.y.abs() < 1e-12);

        let left = n.at(index::LEFT_EYE_CENTER);
        let right = n.at(index::RIGHT_EYE_CENTER);
        assert!((left.distance(&right) - CANONICAL_IPD).abs() < 1e-12);
        assert!((left.y - right.y).abs() < 1e-12, "eye axis must be horizontal");
        assert!(left.x < right.x);
    }

    #[test]
    fn test_translation_invariance() {
        let base = reference_face();
        let a = normalize(&base, MIN_IPD).unwrap();
        let b = normalize(&transformed(&base, 1.0, 0.0, (57.0, -23.5)), MIN_IPD).unwrap();
        assert_same(&a, &b);
    }

    #[test]
    fn test_scale_invariance() {
        let base = reference_face();
        let a = normalize(&base, MIN_IPD).unwrap();
        let b = normalize(&transformed(&base, 2.75, 0.0, (0.0, 0.0)), MIN_IPD).unwrap();
        assert_same(&a, &b);
        assert!((b.interpupillary_px - a.interpupillary_px * 2.75).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_invariance() {
        let base = reference_face();
        let a = normalize(&base, MIN_IPD).unwrap();
        let b = normalize(&transformed(&base, 1.0, 17.0, (0.0, 0.0)), MIN_IPD).unwrap();
        assert_same(&a, &b);
        assert!((b.roll_degrees - 17.0).abs() < 1e-9, "roll = {}", b.roll_degrees);
    }

    #[test]
    fn test_combined_transform_invariance() {
        let base = reference_face();
        let a = normalize(&base, MIN_IPD).unwrap();
        let b = normalize(&transformed(&base, 0.6, -31.0, (140.0, 12.0)), MIN_IPD).unwrap();
        assert_same(&a, &b);
    }

    #[test]
    fn test_zero_ipd_is_degenerate() {
        let mut set = reference_face();
        set.points[index::RIGHT_EYE_CENTER] = set.points[index::LEFT_EYE_CENTER];
        let err = normalize(&set, MIN_IPD).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateGeometry { .. }));
        assert_eq!(err.field(), "interpupillary_distance");
    }

    #[test]
    fn test_small_face_is_degenerate() {
        let small = transformed(&reference_face(), 0.05, 0.0, (0.0, 0.0));
        let err = normalize(&small, MIN_IPD).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_overflowing_ipd_is_degenerate() {
        let mut set = reference_face();
        set.points[index::LEFT_EYE_CENTER].x = -1e200;
        set.points[index::RIGHT_EYE_CENTER].x = 1e200;
        let err = normalize(&set, MIN_IPD).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateGeometry { .. }));
        assert_eq!(err.field(), "interpupillary_distance");
    }

    #[test]
    fn test_invalid_input_reported_before_geometry() {
        let mut set = reference_face();
        set.points.pop();
        let err = normalize(&set, MIN_IPD).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidLandmark { .. }));
    }
}
