//! Deterministic reference landmark set.
//!
//! A mirror-symmetric frontal face with depth, built in inter-pupillary units
//! and placed in a 640×800 image. Used for diagnostics (`mien sample`) and as
//! the fixture for tests. Landmarks no extractor reads sit on the nasal bridge.

use crate::landmarks::{index, CoordinateSpace, LandmarkPoint, LandmarkSet, LANDMARK_COUNT};

const IMAGE_WIDTH: u32 = 640;
const IMAGE_HEIGHT: u32 = 800;
/// Pixels per inter-pupillary unit.
const UNIT_PX: f64 = 64.0;
const CENTER_X: f64 = 320.0;
const CENTER_Y: f64 = 300.0;

/// Face oval as an ellipse: centre y, half-width, half-height.
const OVAL_CENTER_Y: f64 = 0.475;
const OVAL_HALF_WIDTH: f64 = 1.08;
const OVAL_HALF_HEIGHT: f64 = 1.675;
const OVAL_DEPTH: f64 = 0.3;

/// Eye contour as an ellipse around the iris centre.
const EYE_HALF_WIDTH: f64 = 0.24;
const EYE_HALF_HEIGHT: f64 = 0.08;

/// Midline points: (index, y, z).
const MIDLINE: [(usize, f64, f64); 10] = [
    (index::FOREHEAD_CENTER, -1.2, -0.3),
    (index::NASAL_BRIDGE, 0.0, -0.6),
    (index::NASAL_BRIDGE_LOW, 0.2, -0.7),
    (index::NOSE_TIP, 0.9, -1.0),
    (index::NOSE_BOTTOM, 1.05, -0.75),
    (index::UPPER_LIP_TOP, 1.3, -0.83),
    (index::UPPER_LIP_INNER, 1.42, -0.78),
    (index::LOWER_LIP_INNER, 1.44, -0.78),
    (index::LOWER_LIP_BOTTOM, 1.65, -0.75),
    (index::CHIN_TIP, 2.15, -0.6),
];

/// Paired points given for the left side as (left, right, x, y, z); the
/// right side is the mirror image.
const PAIRED: [(usize, usize, f64, f64, f64); 9] = [
    (index::LEFT_EYEBROW_OUTER, index::RIGHT_EYEBROW_OUTER, -0.85, -0.35, -0.05),
    (index::LEFT_EYEBROW_INNER, index::RIGHT_EYEBROW_INNER, -0.2, -0.3, -0.25),
    (index::NOSE_LEFT, index::NOSE_RIGHT, -0.25, 0.95, -0.4),
    (index::MOUTH_LEFT, index::MOUTH_RIGHT, -0.4, 1.43, -0.5),
    (index::UPPER_LIP_LEFT, index::UPPER_LIP_RIGHT, -0.12, 1.31, -0.82),
    (index::LOWER_LIP_LEFT, index::LOWER_LIP_RIGHT, -0.12, 1.62, -0.74),
    (index::LEFT_CHEEK, index::RIGHT_CHEEK, -1.08, 0.475, 0.4),
    (index::LEFT_JAW, index::RIGHT_JAW, -0.85, 1.6, 0.2),
    (index::LEFT_EYE_CENTER, index::RIGHT_EYE_CENTER, -0.5, 0.0, 0.0),
];

/// Build the reference face.
pub fn reference_face() -> LandmarkSet {
    // (x, y, z) in inter-pupillary units, origin at the nasal bridge.
    let mut units = vec![(0.0, 0.0, -0.6); LANDMARK_COUNT];

    // Face oval: compute the right half, mirror it onto the left.
    let n = index::FACE_OVAL.len();
    for k in 0..=n / 2 {
        let theta = -std::f64::consts::FRAC_PI_2 + k as f64 * std::f64::consts::PI / (n / 2) as f64;
        let x = OVAL_HALF_WIDTH * theta.cos();
        let y = OVAL_CENTER_Y + OVAL_HALF_HEIGHT * theta.sin();
        units[index::FACE_OVAL[k]] = (x, y, OVAL_DEPTH);
        if k > 0 && k < n / 2 {
            units[index::FACE_OVAL[n - k]] = (-x, y, OVAL_DEPTH);
        }
    }
    units[index::FOREHEAD_CENTER].0 = 0.0;
    units[index::CHIN_TIP].0 = 0.0;

    // Eye contours: the left eye sweeps from the outer corner along the lower
    // lid; the right eye mirrors it.
    let m = index::LEFT_EYE_CONTOUR.len();
    for k in 0..m {
        let theta = std::f64::consts::PI - k as f64 * 2.0 * std::f64::consts::PI / m as f64;
        let dx = EYE_HALF_WIDTH * theta.cos();
        let dy = EYE_HALF_HEIGHT * theta.sin();
        units[index::LEFT_EYE_CONTOUR[k]] = (-0.5 + dx, dy, 0.0);
        units[index::RIGHT_EYE_CONTOUR[k]] = (0.5 - dx, dy, 0.0);
    }

    for &(i, y, z) in &MIDLINE {
        units[i] = (0.0, y, z);
    }
    for &(l, r, x, y, z) in &PAIRED {
        units[l] = (x, y, z);
        units[r] = (-x, y, z);
    }

    let points = units
        .into_iter()
        .map(|(x, y, z)| {
            LandmarkPoint::new(
                CENTER_X + x * UNIT_PX,
                CENTER_Y + y * UNIT_PX,
                Some(z * UNIT_PX),
            )
        })
        .collect();

    LandmarkSet {
        image_width: IMAGE_WIDTH,
        image_height: IMAGE_HEIGHT,
        coordinate_space: CoordinateSpace::Pixels,
        points,
    }
}

/// The reference face fitted into a `width`×`height` image, scaled
/// uniformly and centred so its geometry is unchanged.
pub fn reference_face_sized(width: u32, height: u32) -> LandmarkSet {
    let mut set = reference_face();
    let scale = (width as f64 / IMAGE_WIDTH as f64).min(height as f64 / IMAGE_HEIGHT as f64);
    let offset_x = (width as f64 - IMAGE_WIDTH as f64 * scale) / 2.0;
    let offset_y = (height as f64 - IMAGE_HEIGHT as f64 * scale) / 2.0;

    for p in &mut set.points {
        p.x = p.x * scale + offset_x;
        p.y = p.y * scale + offset_y;
        p.z = p.z.map(|z| z * scale);
    }
    set.image_width = width;
    set.image_height = height;
    set
}
