//! Dental and lip protrusion relative to the E-line.
//!
//! Several outer and inner lip landmarks per lip give a maximum and an
//! average protrusion; the inner-lip gap tells whether teeth are showing.

use super::eline::distance_mm;
use super::{Measurement, MetricKind};
use crate::geometry::round_to;
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

const UPPER_LIP: [usize; 4] = [
    index::UPPER_LIP_TOP,
    index::UPPER_LIP_LEFT,
    index::UPPER_LIP_RIGHT,
    index::UPPER_LIP_INNER,
];

const LOWER_LIP: [usize; 4] = [
    index::LOWER_LIP_BOTTOM,
    index::LOWER_LIP_LEFT,
    index::LOWER_LIP_RIGHT,
    index::LOWER_LIP_INNER,
];

/// Inner-lip gap (IPD units) above which the teeth are taken to be visible.
const TEETH_VISIBLE_GAP: f64 = 0.08;
/// Protrusion (mm) up to which the dentition reads as normal.
const NORMAL_PROTRUSION_MM: f64 = 1.0;
/// Protrusion (mm) up to which the dentition reads as mildly protruding.
const MILD_PROTRUSION_MM: f64 = 4.0;
/// Average upper/lower difference (mm) within which the lips are balanced.
const BALANCED_LIPS_MM: f64 = 1.5;
/// Lips further behind the E-line than this (mm) read as retruded.
const RETRUDED_LIPS_MM: f64 = -4.0;
const IDEAL_RANGE: &str = "lips 0 to 4 mm behind the E-line";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DentalStatus {
    Normal,
    MildProtrusion,
    MarkedProtrusion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LipStatus {
    Retruded,
    Ideal,
    Protruded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LipBalance {
    Balanced,
    UpperDominant,
    LowerDominant,
}

/// Protrusions are signed millimetre estimates from the E-line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DentalProtrusion {
    pub max_upper_protrusion: f64,
    pub max_lower_protrusion: f64,
    pub avg_upper_protrusion: f64,
    pub avg_lower_protrusion: f64,
    pub lip_status: LipStatus,
    pub dental_status: DentalStatus,
    /// Millimetres beyond the normal protrusion limit; 0 when within it.
    pub severity: f64,
    pub lip_balance: LipBalance,
    pub ideal_range: String,
    pub teeth_visible: bool,
    pub profile_depth: bool,
}

impl DentalProtrusion {
    pub fn max_protrusion(&self) -> f64 {
        self.max_upper_protrusion.max(self.max_lower_protrusion)
    }
}

impl Measurement for DentalProtrusion {
    const KIND: MetricKind = MetricKind::DentalProtrusion;

    fn primary_value(&self) -> f64 {
        self.max_protrusion()
    }

    fn low_confidence(&self) -> bool {
        !self.profile_depth
    }
}

fn max_and_mean(values: &[f64]) -> (f64, f64) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (max, mean)
}

pub fn extract(n: &NormalizedLandmarkSet) -> DentalProtrusion {
    let upper: Vec<f64> = UPPER_LIP.iter().map(|&i| distance_mm(n, i)).collect();
    let lower: Vec<f64> = LOWER_LIP.iter().map(|&i| distance_mm(n, i)).collect();
    let (max_upper, avg_upper) = max_and_mean(&upper);
    let (max_lower, avg_lower) = max_and_mean(&lower);

    let worst = max_upper.max(max_lower);
    let dental_status = if worst <= NORMAL_PROTRUSION_MM {
        DentalStatus::Normal
    } else if worst <= MILD_PROTRUSION_MM {
        DentalStatus::MildProtrusion
    } else {
        DentalStatus::MarkedProtrusion
    };

    let lip_status = if worst > NORMAL_PROTRUSION_MM {
        LipStatus::Protruded
    } else if worst < RETRUDED_LIPS_MM {
        LipStatus::Retruded
    } else {
        LipStatus::Ideal
    };

    let balance = avg_upper - avg_lower;
    let lip_balance = if balance.abs() <= BALANCED_LIPS_MM {
        LipBalance::Balanced
    } else if balance > 0.0 {
        LipBalance::UpperDominant
    } else {
        LipBalance::LowerDominant
    };

    let lip_gap = n.at(index::UPPER_LIP_INNER).distance(&n.at(index::LOWER_LIP_INNER));

    DentalProtrusion {
        max_upper_protrusion: round_to(max_upper, 2),
        max_lower_protrusion: round_to(max_lower, 2),
        avg_upper_protrusion: round_to(avg_upper, 2),
        avg_lower_protrusion: round_to(avg_lower, 2),
        lip_status,
        dental_status,
        severity: round_to((worst - NORMAL_PROTRUSION_MM).max(0.0), 2),
        lip_balance,
        ideal_range: IDEAL_RANGE.to_string(),
        teeth_visible: lip_gap > TEETH_VISIBLE_GAP,
        profile_depth: n.has_depth,
    }
}
