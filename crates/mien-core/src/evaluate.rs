//! Metric evaluation: raw measurement to sub-score and status.
//!
//! Each metric's primary value is scored by a [`ScoreCurve`]: 100 inside the
//! ideal band, falling continuously and monotonically with the distance
//! outside it. The status is derived from the score, never from free text.

use crate::geometry::round_to;
use crate::metrics::{Measurement, MetricKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Qualitative evaluation, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NeedsImprovement,
    Standard,
    Good,
    Ideal,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::NeedsImprovement => "needs improvement",
            Status::Standard => "standard",
            Status::Good => "good",
            Status::Ideal => "ideal",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveShape {
    #[default]
    Linear,
    Gaussian,
}

/// Score curve over a metric's primary value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCurve {
    pub ideal_min: f64,
    pub ideal_max: f64,
    /// Distance outside the band at which a linear curve reaches 0, or the
    /// standard deviation of a gaussian one.
    pub falloff: f64,
    #[serde(default)]
    pub shape: CurveShape,
}

impl ScoreCurve {
    /// Distance from the ideal band; 0 inside it.
    pub fn distance(&self, value: f64) -> f64 {
        if value < self.ideal_min {
            self.ideal_min - value
        } else if value > self.ideal_max {
            value - self.ideal_max
        } else {
            0.0
        }
    }

    /// Sub-score in [0, 100], rounded to one decimal. Non-finite input
    /// scores 0.
    pub fn score(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let t = self.distance(value) / self.falloff;
        let raw = match self.shape {
            CurveShape::Linear => 100.0 * (1.0 - t).max(0.0),
            CurveShape::Gaussian => 100.0 * (-0.5 * t * t).exp(),
        };
        round_to(raw.clamp(0.0, 100.0), 1)
    }
}

/// Minimum sub-score for each status above `NeedsImprovement`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusBands {
    pub ideal: f64,
    pub good: f64,
    pub standard: f64,
}

impl Default for StatusBands {
    fn default() -> Self {
        Self {
            ideal: 90.0,
            good: 75.0,
            standard: 55.0,
        }
    }
}

impl StatusBands {
    pub fn classify(&self, score: f64) -> Status {
        if score >= self.ideal {
            Status::Ideal
        } else if score >= self.good {
            Status::Good
        } else if score >= self.standard {
            Status::Standard
        } else {
            Status::NeedsImprovement
        }
    }
}

/// One evaluated metric group: the raw measurement fields flattened next to
/// its score and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult<R> {
    #[serde(flatten)]
    pub raw: R,
    pub score: f64,
    pub status: Status,
    /// Scored, but down-weighted in the composite.
    pub low_confidence: bool,
}

/// Type-erased view of a [`MetricResult`] for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub kind: MetricKind,
    pub score: f64,
    pub status: Status,
    pub low_confidence: bool,
}

impl<R: Measurement> MetricResult<R> {
    pub fn summary(&self) -> MetricSummary {
        MetricSummary {
            kind: R::KIND,
            score: self.score,
            status: self.status,
            low_confidence: self.low_confidence,
        }
    }
}

/// Score a raw measurement. `pose_unsuitable` marks pose-sensitive metrics
/// as low confidence.
pub fn evaluate<R: Measurement>(
    mut raw: R,
    curve: &ScoreCurve,
    bands: &StatusBands,
    pose_unsuitable: bool,
) -> MetricResult<R> {
    let value = raw.primary_value();
    let score = curve.score(value);
    let status = bands.classify(score);
    raw.record_score(score);

    let fallback = raw.low_confidence();
    if fallback && R::KIND.uses_depth() {
        warn!(metric = %R::KIND, value, "Metric measured without depth; image-plane estimate");
    }
    let low_confidence = fallback || (pose_unsuitable && R::KIND.is_pose_sensitive());

    MetricResult {
        raw,
        score,
        status,
        low_confidence,
    }
}
