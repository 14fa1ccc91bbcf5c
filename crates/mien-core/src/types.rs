use crate::composite::CompositeScore;
use crate::evaluate::{MetricResult, MetricSummary};
use crate::metrics::{
    DentalProtrusion, ELine, FaceAngle, FaceContour, FacialHarmony, NasolabialAngle, PhiltrumChin,
    Proportions, Symmetry, VLine,
};
use serde::{Deserialize, Serialize};

/// Metadata about the analysed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub total_landmarks: usize,
    pub has_depth: bool,
    pub interpupillary_px: f64,
    /// SHA-256 of the landmark input, hex encoded. Stable across runs.
    pub fingerprint: String,
}

/// Complete result of one analysis. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub image_info: ImageInfo,
    pub face_angle: MetricResult<FaceAngle>,
    pub face_contour: MetricResult<FaceContour>,
    pub eline: MetricResult<ELine>,
    pub proportions: MetricResult<Proportions>,
    pub philtrum_chin: MetricResult<PhiltrumChin>,
    pub nasolabial_angle: MetricResult<NasolabialAngle>,
    pub vline: MetricResult<VLine>,
    pub symmetry: MetricResult<Symmetry>,
    pub dental_protrusion: MetricResult<DentalProtrusion>,
    pub facial_harmony: MetricResult<FacialHarmony>,
    pub overall_score: CompositeScore,
    pub beauty_advice: Vec<String>,
    /// Present when the pose is not frontal enough for full confidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_warning: Option<String>,
}

impl AnalysisResult {
    /// All ten metric summaries in canonical order.
    pub fn summaries(&self) -> Vec<MetricSummary> {
        vec![
            self.face_angle.summary(),
            self.face_contour.summary(),
            self.eline.summary(),
            self.proportions.summary(),
            self.philtrum_chin.summary(),
            self.nasolabial_angle.summary(),
            self.vline.summary(),
            self.symmetry.summary(),
            self.dental_protrusion.summary(),
            self.facial_harmony.summary(),
        ]
    }
}
