//! Facial harmony: feature widths relative to face width, compared with a
//! fixed vector of ideal ratios.

use super::{Measurement, MetricKind};
use crate::geometry::{polygon_area, round_to, safe_ratio};
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

/// Ideal feature-to-face-width ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonyTargets {
    pub eye_face_ratio: f64,
    pub nose_face_ratio: f64,
    pub mouth_face_ratio: f64,
}

/// Lengths in inter-pupillary units, areas in IPD².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacialHarmony {
    pub avg_eye_width: f64,
    pub nose_width: f64,
    pub mouth_width: f64,
    pub face_width: f64,
    pub face_height: f64,
    pub face_area: f64,
    pub eye_face_ratio: f64,
    pub nose_face_ratio: f64,
    pub mouth_face_ratio: f64,
    pub eye_area_ratio: f64,
    /// Relative RMS distance of the feature ratios from the targets.
    pub golden_deviation: f64,
    pub face_aspect_ratio: f64,
    /// `(1 - golden_deviation) * 100` until evaluated, then the curve score.
    pub harmony_score: f64,
}

impl Measurement for FacialHarmony {
    const KIND: MetricKind = MetricKind::FacialHarmony;

    fn primary_value(&self) -> f64 {
        self.golden_deviation
    }

    fn record_score(&mut self, score: f64) {
        self.harmony_score = score;
    }
}

/// Relative RMS deviation of `actual` from `target`, component-wise.
fn relative_rms(actual: &[f64], target: &[f64]) -> f64 {
    let sum: f64 = actual
        .iter()
        .zip(target)
        .map(|(a, t)| safe_ratio(a - t, *t, 1.0).powi(2))
        .sum();
    (sum / actual.len().max(1) as f64).sqrt()
}

pub fn extract(n: &NormalizedLandmarkSet, targets: &HarmonyTargets) -> FacialHarmony {
    let left_eye = n.at(index::LEFT_EYE_OUTER).distance(&n.at(index::LEFT_EYE_INNER));
    let right_eye = n.at(index::RIGHT_EYE_OUTER).distance(&n.at(index::RIGHT_EYE_INNER));
    let avg_eye_width = (left_eye + right_eye) / 2.0;
    let nose_width = n.at(index::NOSE_LEFT).distance(&n.at(index::NOSE_RIGHT));
    let mouth_width = n.at(index::MOUTH_LEFT).distance(&n.at(index::MOUTH_RIGHT));

    let face_width = n.at(index::LEFT_CHEEK).distance(&n.at(index::RIGHT_CHEEK));
    let face_height = n.at(index::FOREHEAD_CENTER).distance(&n.at(index::CHIN_TIP));
    let face_area = polygon_area(&n.planar(&index::FACE_OVAL));

    let eye_face_ratio = safe_ratio(avg_eye_width, face_width, 0.0);
    let nose_face_ratio = safe_ratio(nose_width, face_width, 0.0);
    let mouth_face_ratio = safe_ratio(mouth_width, face_width, 0.0);

    let eye_area = (polygon_area(&n.planar(&index::LEFT_EYE_CONTOUR))
        + polygon_area(&n.planar(&index::RIGHT_EYE_CONTOUR)))
        / 2.0;
    let eye_area_ratio = safe_ratio(eye_area, face_area, 0.0);

    let golden_deviation = relative_rms(
        &[eye_face_ratio, nose_face_ratio, mouth_face_ratio],
        &[targets.eye_face_ratio, targets.nose_face_ratio, targets.mouth_face_ratio],
    );
    let harmony_score = ((1.0 - golden_deviation) * 100.0).clamp(0.0, 100.0);

    FacialHarmony {
        avg_eye_width: round_to(avg_eye_width, 3),
        nose_width: round_to(nose_width, 3),
        mouth_width: round_to(mouth_width, 3),
        face_width: round_to(face_width, 3),
        face_height: round_to(face_height, 3),
        face_area: round_to(face_area, 3),
        eye_face_ratio: round_to(eye_face_ratio, 3),
        nose_face_ratio: round_to(nose_face_ratio, 3),
        mouth_face_ratio: round_to(mouth_face_ratio, 3),
        eye_area_ratio: round_to(eye_area_ratio, 4),
        golden_deviation: round_to(golden_deviation, 3),
        face_aspect_ratio: round_to(safe_ratio(face_height, face_width, 0.0), 3),
        harmony_score: round_to(harmony_score, 1),
    }
}
