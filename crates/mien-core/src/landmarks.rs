//! Landmark input model and the detector's fixed index scheme.
//!
//! Input comes from a 478-point face mesh with iris refinement. Index
//! semantics are a contract with the detector; every extractor addresses
//! points through the names in [`index`], never through bare numbers.

use crate::error::AnalysisError;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of points in a refined face mesh (468 surface + 10 iris).
pub const LANDMARK_COUNT: usize = 478;

/// Named landmark indices. "Left"/"right" refer to the image sides.
pub mod index {
    pub const NOSE_TIP: usize = 1;
    pub const NOSE_BOTTOM: usize = 2;
    pub const NASAL_BRIDGE: usize = 168;
    pub const NASAL_BRIDGE_LOW: usize = 6;
    pub const FOREHEAD_CENTER: usize = 10;
    pub const CHIN_TIP: usize = 152;

    pub const LEFT_EYE_CENTER: usize = 468;
    pub const RIGHT_EYE_CENTER: usize = 473;
    pub const LEFT_EYE_OUTER: usize = 33;
    pub const LEFT_EYE_INNER: usize = 133;
    pub const RIGHT_EYE_OUTER: usize = 263;
    pub const RIGHT_EYE_INNER: usize = 362;
    pub const LEFT_EYE_TOP: usize = 159;
    pub const LEFT_EYE_BOTTOM: usize = 145;
    pub const RIGHT_EYE_TOP: usize = 386;
    pub const RIGHT_EYE_BOTTOM: usize = 374;

    pub const LEFT_EYEBROW_OUTER: usize = 70;
    pub const LEFT_EYEBROW_INNER: usize = 107;
    pub const RIGHT_EYEBROW_OUTER: usize = 300;
    pub const RIGHT_EYEBROW_INNER: usize = 336;

    pub const NOSE_LEFT: usize = 131;
    pub const NOSE_RIGHT: usize = 360;

    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;
    pub const UPPER_LIP_TOP: usize = 0;
    pub const UPPER_LIP_LEFT: usize = 37;
    pub const UPPER_LIP_RIGHT: usize = 267;
    pub const UPPER_LIP_INNER: usize = 13;
    pub const LOWER_LIP_INNER: usize = 14;
    pub const LOWER_LIP_LEFT: usize = 84;
    pub const LOWER_LIP_RIGHT: usize = 314;
    pub const LOWER_LIP_BOTTOM: usize = 17;

    pub const LEFT_CHEEK: usize = 234;
    pub const RIGHT_CHEEK: usize = 454;
    pub const LEFT_JAW: usize = 172;
    pub const RIGHT_JAW: usize = 397;
    pub const LEFT_JAW_LOW: usize = 136;
    pub const RIGHT_JAW_LOW: usize = 365;
    pub const LEFT_GONION: usize = 58;
    pub const RIGHT_GONION: usize = 288;
    pub const LEFT_TEMPLE: usize = 93;
    pub const RIGHT_TEMPLE: usize = 323;

    /// Face oval, clockwise from the forehead centre.
    pub const FACE_OVAL: [usize; 36] = [
        10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377,
        152, 148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
    ];

    /// Left eye contour, outer corner first, lower lid then upper lid.
    pub const LEFT_EYE_CONTOUR: [usize; 16] = [
        33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
    ];

    /// Right eye contour, outer corner first, lower lid then upper lid.
    pub const RIGHT_EYE_CONTOUR: [usize; 16] = [
        263, 249, 390, 373, 374, 380, 381, 382, 362, 398, 384, 385, 386, 387, 388, 466,
    ];

    /// Bilateral pairs (left, right) used for symmetry.
    pub const BILATERAL_PAIRS: [(usize, usize); 14] = [
        (LEFT_EYE_CENTER, RIGHT_EYE_CENTER),
        (LEFT_EYE_OUTER, RIGHT_EYE_OUTER),
        (LEFT_EYE_INNER, RIGHT_EYE_INNER),
        (LEFT_EYE_TOP, RIGHT_EYE_TOP),
        (LEFT_EYE_BOTTOM, RIGHT_EYE_BOTTOM),
        (LEFT_EYEBROW_OUTER, RIGHT_EYEBROW_OUTER),
        (LEFT_EYEBROW_INNER, RIGHT_EYEBROW_INNER),
        (NOSE_LEFT, NOSE_RIGHT),
        (MOUTH_LEFT, MOUTH_RIGHT),
        (LEFT_CHEEK, RIGHT_CHEEK),
        (LEFT_JAW, RIGHT_JAW),
        (LEFT_JAW_LOW, RIGHT_JAW_LOW),
        (LEFT_GONION, RIGHT_GONION),
        (LEFT_TEMPLE, RIGHT_TEMPLE),
    ];

    /// Points on the facial midline.
    pub const MIDLINE: [usize; 8] = [
        FOREHEAD_CENTER,
        NASAL_BRIDGE,
        NASAL_BRIDGE_LOW,
        NOSE_TIP,
        NOSE_BOTTOM,
        UPPER_LIP_TOP,
        LOWER_LIP_BOTTOM,
        CHIN_TIP,
    ];
}

/// How point coordinates are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Image pixels.
    #[default]
    Pixels,
    /// Fractions of image width/height in [0, 1]; z is a fraction of width.
    Normalized,
}

/// A single detector output point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl LandmarkPoint {
    pub const fn new(x: f64, y: f64, z: Option<f64>) -> Self {
        Self { x, y, z }
    }
}

/// All landmarks for one face plus the source image dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub image_width: u32,
    pub image_height: u32,
    #[serde(default)]
    pub coordinate_space: CoordinateSpace,
    pub points: Vec<LandmarkPoint>,
}

/// A validated landmark set converted to pixel space.
#[derive(Debug, Clone)]
pub(crate) struct PixelLandmarks {
    pub points: Vec<Point>,
    pub has_depth: bool,
}

impl LandmarkSet {
    /// Check the structural contract: image dimensions, point count, finite
    /// coordinates, and depth present on every point or on none.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(AnalysisError::invalid(
                "image_dimensions",
                format!("{}x{} is not a valid image size", self.image_width, self.image_height),
            ));
        }

        if self.points.len() != LANDMARK_COUNT {
            return Err(AnalysisError::invalid(
                "points",
                format!("expected {LANDMARK_COUNT} landmarks, got {}", self.points.len()),
            ));
        }

        let with_depth = self.points.iter().filter(|p| p.z.is_some()).count();
        if with_depth != 0 && with_depth != self.points.len() {
            return Err(AnalysisError::invalid(
                "points.z",
                format!("depth given for {with_depth} of {LANDMARK_COUNT} landmarks; supply it for all or none"),
            ));
        }

        for (i, p) in self.points.iter().enumerate() {
            let finite = p.x.is_finite() && p.y.is_finite() && p.z.map_or(true, f64::is_finite);
            if !finite {
                return Err(AnalysisError::invalid(
                    format!("points[{i}]"),
                    "coordinate is not a finite number",
                ));
            }
        }

        Ok(())
    }

    pub fn has_depth(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.z.is_some())
    }

    /// Validate, then convert to pixel coordinates.
    pub(crate) fn to_pixels(&self) -> Result<PixelLandmarks, AnalysisError> {
        self.validate()?;

        let (sx, sy) = match self.coordinate_space {
            CoordinateSpace::Pixels => (1.0, 1.0),
            CoordinateSpace::Normalized => (self.image_width as f64, self.image_height as f64),
        };

        let points = self
            .points
            .iter()
            .map(|p| Point::new(p.x * sx, p.y * sy, p.z.unwrap_or(0.0) * sx))
            .collect();

        Ok(PixelLandmarks {
            points,
            has_depth: self.has_depth(),
        })
    }

    /// SHA-256 over the image size, coordinate space and every coordinate.
    ///
    /// Identical input always yields the same hex digest; callers key their
    /// result cache on it.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.image_width.to_le_bytes());
        hasher.update(self.image_height.to_le_bytes());
        hasher.update([self.coordinate_space as u8]);
        for p in &self.points {
            hasher.update(p.x.to_le_bytes());
            hasher.update(p.y.to_le_bytes());
            match p.z {
                Some(z) => {
                    hasher.update([1u8]);
                    hasher.update(z.to_le_bytes());
                }
                None => hasher.update([0u8]),
            }
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}
