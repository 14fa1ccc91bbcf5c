//! E-line: lip position relative to the nose-tip → chin-tip line.
//!
//! Measured in the profile plane (forward depth against height) when the
//! detector supplies depth. Without depth the image plane is used as a
//! fallback and the measurement is flagged low-confidence.

use super::{Measurement, MetricKind, MEAN_IPD_MM};
use crate::geometry::{round_to, signed_distance_to_line};
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

/// Within this many millimetres either side of the line a lip counts as on it.
const ON_LINE_MM: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LipPosition {
    BehindLine,
    OnLine,
    UpperForward,
    LowerForward,
}

/// Distances are signed millimetre estimates; positive means the lip sits
/// in front of the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ELine {
    pub upper_lip_distance: f64,
    pub lower_lip_distance: f64,
    pub max_protrusion: f64,
    pub position: LipPosition,
    pub profile_depth: bool,
}

impl Measurement for ELine {
    const KIND: MetricKind = MetricKind::Eline;

    fn primary_value(&self) -> f64 {
        self.max_protrusion
    }

    fn low_confidence(&self) -> bool {
        !self.profile_depth
    }
}

/// Signed distance in millimetres from landmark `i` to the E-line.
pub(crate) fn distance_mm(n: &NormalizedLandmarkSet, i: usize) -> f64 {
    let project = |p: crate::geometry::Point| {
        if n.has_depth {
            p.profile()
        } else {
            p.planar()
        }
    };
    let nose = project(n.at(index::NOSE_TIP));
    let chin = project(n.at(index::CHIN_TIP));
    signed_distance_to_line(project(n.at(i)), nose, chin) * MEAN_IPD_MM
}

pub fn extract(n: &NormalizedLandmarkSet) -> ELine {
    let upper = distance_mm(n, index::UPPER_LIP_TOP);
    let lower = distance_mm(n, index::LOWER_LIP_BOTTOM);
    let max_protrusion = upper.max(lower);

    let position = if max_protrusion < -ON_LINE_MM {
        LipPosition::BehindLine
    } else if max_protrusion <= ON_LINE_MM {
        LipPosition::OnLine
    } else if upper >= lower {
        LipPosition::UpperForward
    } else {
        LipPosition::LowerForward
    };

    ELine {
        upper_lip_distance: round_to(upper, 2),
        lower_lip_distance: round_to(lower, 2),
        max_protrusion: round_to(max_protrusion, 2),
        position,
        profile_depth: n.has_depth,
    }
}
