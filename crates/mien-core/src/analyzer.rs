//! The analysis pipeline.
//!
//! normalize → pose gate → extract ×10 → evaluate ×10 → composite → explain.
//! An [`Analyzer`] holds only its validated configuration; `analyze` is a
//! pure function of its input.

use crate::composite;
use crate::config::EngineConfig;
use crate::error::{AnalysisError, ConfigError};
use crate::evaluate::{evaluate, MetricResult};
use crate::explain::explain;
use crate::geometry::round_to;
use crate::landmarks::{LandmarkSet, LANDMARK_COUNT};
use crate::metrics::{self, Measurement};
use crate::normalize::normalize;
use crate::types::{AnalysisResult, ImageInfo};
use tracing::{debug, info, warn};

pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    /// Build an analyzer, validating the configuration eagerly.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_builtin_config() -> Result<Self, ConfigError> {
        Self::new(EngineConfig::builtin()?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn score<R: Measurement>(&self, raw: R, pose_unsuitable: bool) -> MetricResult<R> {
        let rule = self.config.metrics.get(R::KIND);
        evaluate(raw, &rule.curve, &self.config.status_bands, pose_unsuitable)
    }

    /// Run the full pipeline on one landmark set.
    ///
    /// Fails with `InvalidLandmark` for malformed input and with
    /// `DegenerateGeometry` when the face is too small or seen in profile.
    pub fn analyze(&self, landmarks: &LandmarkSet) -> Result<AnalysisResult, AnalysisError> {
        let config = &self.config;
        let n = normalize(landmarks, config.normalization.min_interpupillary_px)?;

        let face_angle = metrics::pose::extract(&n, config.pose.min_confidence);
        let offset = (face_angle.ratio - 0.5).abs();
        if offset > config.pose.max_ratio_offset {
            return Err(AnalysisError::degenerate(
                "face_angle",
                format!("left/right ratio {:.2} indicates a profile view", face_angle.ratio),
            ));
        }
        let unsuitable = !face_angle.suitable_for_analysis;
        if unsuitable {
            warn!(
                ratio = face_angle.ratio,
                confidence = face_angle.confidence,
                "Pose not frontal; pose-sensitive metrics down-weighted"
            );
        }

        let angle_warning = unsuitable.then(|| {
            format!(
                "The face is not frontal (confidence {:.2}); pose-sensitive scores carry less weight. Retake the photo facing the camera.",
                face_angle.confidence
            )
        });

        let face_angle = self.score(face_angle, unsuitable);
        let face_contour = self.score(metrics::contour::extract(&n), unsuitable);
        let eline = self.score(metrics::eline::extract(&n), unsuitable);
        let proportions = self.score(
            metrics::proportions::extract(&n, &config.proportions.ideals),
            unsuitable,
        );
        let philtrum_chin = self.score(
            metrics::philtrum::extract(&n, &config.philtrum_chin.ideals),
            unsuitable,
        );
        let nasolabial_angle = self.score(metrics::nasolabial::extract(&n), unsuitable);
        let vline = self.score(metrics::vline::extract(&n), unsuitable);
        let symmetry = self.score(metrics::symmetry::extract(&n), unsuitable);
        let dental_protrusion = self.score(metrics::dental::extract(&n), unsuitable);
        let facial_harmony = self.score(
            metrics::harmony::extract(&n, &config.harmony.golden),
            unsuitable,
        );
        debug!("metrics extracted and evaluated");

        let summaries = [
            face_angle.summary(),
            face_contour.summary(),
            eline.summary(),
            proportions.summary(),
            philtrum_chin.summary(),
            nasolabial_angle.summary(),
            vline.summary(),
            symmetry.summary(),
            dental_protrusion.summary(),
            facial_harmony.summary(),
        ];
        let mut overall_score = composite::score(&summaries, config);
        let explanation = explain(&summaries, &overall_score, config);
        overall_score.explanation_details = explanation.details;

        let result = AnalysisResult {
            image_info: ImageInfo {
                width: landmarks.image_width,
                height: landmarks.image_height,
                total_landmarks: LANDMARK_COUNT,
                has_depth: n.has_depth,
                interpupillary_px: round_to(n.interpupillary_px, 2),
                fingerprint: landmarks.fingerprint(),
            },
            face_angle,
            face_contour,
            eline,
            proportions,
            philtrum_chin,
            nasolabial_angle,
            vline,
            symmetry,
            dental_protrusion,
            facial_harmony,
            overall_score,
            beauty_advice: explanation.advice,
            angle_warning,
        };

        info!(
            score = result.overall_score.score,
            tier = %result.overall_score.tier,
            severe_flaws = result.overall_score.severe_flaws.len(),
            "Analysis complete"
        );
        Ok(result)
    }
}
