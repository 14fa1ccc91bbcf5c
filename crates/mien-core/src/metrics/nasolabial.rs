//! Nasolabial angle: columella against upper lip, measured at the subnasale.

use super::{Measurement, MetricKind};
use crate::geometry::{angle_at, round_to, Point};
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

const UPTURNED_DEGREES: f64 = 115.0;
const DROOPING_DEGREES: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipRotation {
    Drooping,
    Balanced,
    Upturned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasolabialAngle {
    pub angle: f64,
    pub tip_rotation: TipRotation,
    pub profile_depth: bool,
}

impl Measurement for NasolabialAngle {
    const KIND: MetricKind = MetricKind::NasolabialAngle;

    fn primary_value(&self) -> f64 {
        self.angle
    }

    fn low_confidence(&self) -> bool {
        !self.profile_depth
    }
}

pub fn extract(n: &NormalizedLandmarkSet) -> NasolabialAngle {
    let project = |p: Point| if n.has_depth { p.profile() } else { p.planar() };

    let subnasale = project(n.at(index::NOSE_BOTTOM));
    let columella = project(n.at(index::NOSE_TIP));
    let upper_lip = project(n.at(index::UPPER_LIP_TOP));
    let angle = angle_at(subnasale, columella, upper_lip);

    let tip_rotation = if angle > UPTURNED_DEGREES {
        TipRotation::Upturned
    } else if angle < DROOPING_DEGREES {
        TipRotation::Drooping
    } else {
        TipRotation::Balanced
    };

    NasolabialAngle {
        angle: round_to(angle, 1),
        tip_rotation,
        profile_depth: n.has_depth,
    }
}
