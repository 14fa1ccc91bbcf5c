//! Planar geometry primitives shared by the normalizer and metric extractors.
//!
//! All functions are total: degenerate input (coincident points, zero-length
//! vectors, polygons with fewer than three vertices) yields a best-effort
//! value instead of NaN.

use serde::{Deserialize, Serialize};

/// Below this length a vector is treated as zero.
pub const EPSILON: f64 = 1e-9;

/// A landmark coordinate. `z` is relative depth (smaller = closer to the
/// camera) and is zero when the detector supplied none.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the image plane (x, y).
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Project onto the profile plane: forward depth (`-z`) as the first
    /// axis, vertical (`y`) as the second.
    pub fn profile(&self) -> (f64, f64) {
        (-self.z, self.y)
    }

    /// Project onto the image plane.
    pub fn planar(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Angle in degrees at `vertex` between the rays towards `a` and `b`.
///
/// Returns 0.0 when either ray has zero length.
pub fn angle_at(vertex: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let u = (a.0 - vertex.0, a.1 - vertex.1);
    let v = (b.0 - vertex.0, b.1 - vertex.1);
    let nu = (u.0 * u.0 + u.1 * u.1).sqrt();
    let nv = (v.0 * v.0 + v.1 * v.1).sqrt();
    if nu < EPSILON || nv < EPSILON {
        return 0.0;
    }
    let cos = ((u.0 * v.0 + u.1 * v.1) / (nu * nv)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Signed perpendicular distance from `p` to the line through `a` and `b`.
///
/// Positive when `p` lies on the side of increasing first coordinate for a
/// line running top-to-bottom (from `a` above to `b` below). For the profile
/// plane this means "in front of the line". Falls back to the unsigned
/// distance to `a` when the line is degenerate.
pub fn signed_distance_to_line(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let d = (b.0 - a.0, b.1 - a.1);
    let len = (d.0 * d.0 + d.1 * d.1).sqrt();
    if len < EPSILON {
        return ((p.0 - a.0).powi(2) + (p.1 - a.1).powi(2)).sqrt();
    }
    let cross = d.0 * (p.1 - a.1) - d.1 * (p.0 - a.0);
    -cross / len
}

/// Polygon area by the shoelace formula (always non-negative).
pub fn polygon_area(points: &[(f64, f64)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice += p.0 * q.1 - q.0 * p.1;
    }
    twice.abs() / 2.0
}

/// Closed polygon perimeter.
pub fn polygon_perimeter(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let q = points[(i + 1) % points.len()];
            ((q.0 - p.0).powi(2) + (q.1 - p.1).powi(2)).sqrt()
        })
        .sum()
}

/// Divide, returning `fallback` when the denominator is effectively zero.
pub fn safe_ratio(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator.abs() < EPSILON {
        fallback
    } else {
        numerator / denominator
    }
}

/// Round to a fixed number of decimal places. Normalizes `-0.0` to `0.0`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_angle() {
        let a = angle_at((0.0, 0.0), (1.0, 0.0), (0.0, 1.0));
        assert!((a - 90.0).abs() < 1e-9, "angle = {a}");
    }

    #[test]
    fn test_straight_angle() {
        let a = angle_at((0.0, 0.0), (-1.0, 0.0), (1.0, 0.0));
        assert!((a - 180.0).abs() < 1e-9, "angle = {a}");
    }

    #[test]
    fn test_degenerate_angle_is_zero() {
        assert_eq!(angle_at((1.0, 1.0), (1.0, 1.0), (2.0, 2.0)), 0.0);
    }

    #[test]
    fn test_signed_distance_sign() {
        // Vertical line running downward along the second axis.
        let a = (0.0, 0.0);
        let b = (0.0, 10.0);
        assert!((signed_distance_to_line((2.0, 5.0), a, b) - 2.0).abs() < 1e-9);
        assert!((signed_distance_to_line((-3.0, 5.0), a, b) + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_signed_distance_degenerate_line() {
        let d = signed_distance_to_line((3.0, 4.0), (0.0, 0.0), (0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_square_area_and_perimeter() {
        let square = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        assert!((polygon_area(&square) - 1.0).abs() < 1e-12);
        assert!((polygon_perimeter(&square) - 4.0).abs() < 1e-12);

        let reversed: Vec<_> = square.iter().rev().copied().collect();
        assert!((polygon_area(&reversed) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_to_clears_negative_zero() {
        let r = round_to(-1e-12, 2);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive());
        assert_eq!(round_to(1.23456, 3), 1.235);
    }

    #[test]
    fn test_safe_ratio_fallback() {
        assert_eq!(safe_ratio(1.0, 0.0, 0.5), 0.5);
        assert_eq!(safe_ratio(1.0, 4.0, 0.5), 0.25);
    }
}
