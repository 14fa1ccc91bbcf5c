//! Engine configuration.
//!
//! Weights, score curves, status bands, tier thresholds and advice templates
//! are data, not code. The built-in configuration is embedded at compile time
//! from `contrib/config/default.toml`; callers may load a replacement from a
//! file or string. Every constructor validates eagerly, so a bad table fails
//! at startup rather than mid-request.

use crate::composite::Tier;
use crate::error::ConfigError;
use crate::evaluate::{ScoreCurve, StatusBands};
use crate::metrics::harmony::HarmonyTargets;
use crate::metrics::{MetricKind, NamedRatio};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Built-in configuration, embedded from `contrib/config/default.toml`.
const DEFAULT_CONFIG: &str = include_str!("../../../contrib/config/default.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Sub-score below which a metric is a severe flaw, unless its rule
    /// overrides it.
    pub severe_floor: f64,
    /// Used when no metric calls for specific advice.
    pub general_advice: Vec<String>,
    pub disclaimer: String,
    pub normalization: NormalizationConfig,
    pub pose: PoseConfig,
    pub status_bands: StatusBands,
    pub metrics: MetricTable<MetricRule>,
    /// Ordered from the highest threshold down; the last entry starts at 0.
    pub tiers: Vec<TierRule>,
    pub explanation: ExplanationConfig,
    pub proportions: IdealTable,
    pub philtrum_chin: IdealTable,
    pub harmony: HarmonyConfig,
    pub catalog: MetricTable<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Smallest usable inter-pupillary distance, in pixels.
    pub min_interpupillary_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig {
    /// Frontal confidence at or above which the pose is suitable.
    pub min_confidence: f64,
    /// Largest tolerated offset of the left/right ratio from 0.5 before the
    /// request is rejected as a profile shot.
    pub max_ratio_offset: f64,
    /// Composite weight multiplier for low-confidence metrics.
    pub low_confidence_weight: f64,
}

/// One value per metric group, addressed by [`MetricKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTable<T> {
    pub face_angle: T,
    pub face_contour: T,
    pub eline: T,
    pub proportions: T,
    pub philtrum_chin: T,
    pub nasolabial_angle: T,
    pub vline: T,
    pub symmetry: T,
    pub dental_protrusion: T,
    pub facial_harmony: T,
}

impl<T> MetricTable<T> {
    pub fn get(&self, kind: MetricKind) -> &T {
        match kind {
            MetricKind::FaceAngle => &self.face_angle,
            MetricKind::FaceContour => &self.face_contour,
            MetricKind::Eline => &self.eline,
            MetricKind::Proportions => &self.proportions,
            MetricKind::PhiltrumChin => &self.philtrum_chin,
            MetricKind::NasolabialAngle => &self.nasolabial_angle,
            MetricKind::Vline => &self.vline,
            MetricKind::Symmetry => &self.symmetry,
            MetricKind::DentalProtrusion => &self.dental_protrusion,
            MetricKind::FacialHarmony => &self.facial_harmony,
        }
    }

    pub fn get_mut(&mut self, kind: MetricKind) -> &mut T {
        match kind {
            MetricKind::FaceAngle => &mut self.face_angle,
            MetricKind::FaceContour => &mut self.face_contour,
            MetricKind::Eline => &mut self.eline,
            MetricKind::Proportions => &mut self.proportions,
            MetricKind::PhiltrumChin => &mut self.philtrum_chin,
            MetricKind::NasolabialAngle => &mut self.nasolabial_angle,
            MetricKind::Vline => &mut self.vline,
            MetricKind::Symmetry => &mut self.symmetry,
            MetricKind::DentalProtrusion => &mut self.dental_protrusion,
            MetricKind::FacialHarmony => &mut self.facial_harmony,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRule {
    /// Relative weight in the composite; need not sum to 1 across metrics.
    pub weight: f64,
    pub curve: ScoreCurve,
    /// Severe-flaw floor for this metric; defaults to the global floor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
    /// Population-typical sub-score; defaults to the explanation default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub min_score: f64,
    pub tier: Tier,
    pub level: String,
    pub description: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationConfig {
    /// Sub-score at or above which a metric is a strong point.
    pub strong_threshold: f64,
    /// Sub-score below which a metric is a weak point.
    pub weak_threshold: f64,
    pub typical_score: f64,
    /// Distance from the typical score that makes a bonus or penalty.
    pub bonus_margin: f64,
    pub max_advice: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealTable {
    pub ideals: Vec<NamedRatio>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonyConfig {
    pub golden: HarmonyTargets,
}

/// Human-facing text for one metric group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub label: String,
    pub strong: String,
    pub weak: String,
    pub suggestion: String,
    #[serde(default)]
    pub advice: AdviceTemplates,
}

/// Advice strings keyed by the status that triggers them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceTemplates {
    #[serde(default)]
    pub needs_improvement: Vec<String>,
    #[serde(default)]
    pub standard: Vec<String>,
    #[serde(default)]
    pub good: Vec<String>,
}

impl EngineConfig {
    /// The embedded default configuration.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&src)?;
        debug!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Severe-flaw floor for one metric.
    pub fn floor(&self, kind: MetricKind) -> f64 {
        self.metrics.get(kind).floor.unwrap_or(self.severe_floor)
    }

    /// Population-typical sub-score for one metric.
    pub fn typical(&self, kind: MetricKind) -> f64 {
        self.metrics
            .get(kind)
            .typical
            .unwrap_or(self.explanation.typical_score)
    }

    /// Check every table for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("normalization.min_interpupillary_px", self.normalization.min_interpupillary_px)?;

        check_range("pose.min_confidence", self.pose.min_confidence, 0.0, 1.0)?;
        check_positive("pose.max_ratio_offset", self.pose.max_ratio_offset)?;
        if self.pose.max_ratio_offset > 0.5 {
            return Err(ConfigError::invalid("pose.max_ratio_offset", "must not exceed 0.5"));
        }
        check_range("pose.low_confidence_weight", self.pose.low_confidence_weight, 0.0, 1.0)?;

        let bands = &self.status_bands;
        check_range("status_bands.ideal", bands.ideal, 0.0, 100.0)?;
        check_positive("status_bands.standard", bands.standard)?;
        if !(bands.standard < bands.good && bands.good < bands.ideal) {
            return Err(ConfigError::invalid(
                "status_bands",
                "bands must satisfy standard < good < ideal",
            ));
        }

        check_range("severe_floor", self.severe_floor, 0.0, 100.0)?;

        let mut total_weight = 0.0;
        for kind in MetricKind::ALL {
            self.validate_rule(kind)?;
            total_weight += self.metrics.get(kind).weight;
        }
        if total_weight <= 0.0 {
            return Err(ConfigError::invalid("metrics", "total weight must be positive"));
        }

        self.validate_tiers()?;

        let ex = &self.explanation;
        check_range("explanation.strong_threshold", ex.strong_threshold, 0.0, 100.0)?;
        check_range("explanation.weak_threshold", ex.weak_threshold, 0.0, 100.0)?;
        if ex.weak_threshold >= ex.strong_threshold {
            return Err(ConfigError::invalid(
                "explanation.weak_threshold",
                "must be below explanation.strong_threshold",
            ));
        }
        check_range("explanation.typical_score", ex.typical_score, 0.0, 100.0)?;
        check_range("explanation.bonus_margin", ex.bonus_margin, 0.0, 100.0)?;
        if ex.max_advice == 0 {
            return Err(ConfigError::invalid("explanation.max_advice", "must be at least 1"));
        }

        check_ideals("proportions.ideals", &self.proportions.ideals)?;
        check_ideals("philtrum_chin.ideals", &self.philtrum_chin.ideals)?;
        let golden = &self.harmony.golden;
        check_positive("harmony.golden.eye_face_ratio", golden.eye_face_ratio)?;
        check_positive("harmony.golden.nose_face_ratio", golden.nose_face_ratio)?;
        check_positive("harmony.golden.mouth_face_ratio", golden.mouth_face_ratio)?;

        check_texts("general_advice", &self.general_advice)?;
        for kind in MetricKind::ALL {
            self.validate_catalog(kind)?;
        }

        Ok(())
    }

    fn validate_catalog(&self, kind: MetricKind) -> Result<(), ConfigError> {
        let entry = self.catalog.get(kind);
        let field = |name: &str| format!("catalog.{kind}.{name}");

        for (name, text) in [
            ("label", &entry.label),
            ("strong", &entry.strong),
            ("weak", &entry.weak),
            ("suggestion", &entry.suggestion),
        ] {
            if text.trim().is_empty() {
                return Err(ConfigError::invalid(field(name), "must not be empty"));
            }
        }

        let advice = &entry.advice;
        check_texts(&field("advice.needs_improvement"), &advice.needs_improvement)?;
        for (name, templates) in [("advice.standard", &advice.standard), ("advice.good", &advice.good)] {
            if templates.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::invalid(field(name), "templates must not be empty"));
            }
        }
        Ok(())
    }

    fn validate_rule(&self, kind: MetricKind) -> Result<(), ConfigError> {
        let rule = self.metrics.get(kind);
        let field = |name: &str| format!("metrics.{kind}.{name}");

        if !rule.weight.is_finite() || rule.weight < 0.0 {
            return Err(ConfigError::invalid(field("weight"), "must be finite and non-negative"));
        }

        let curve = &rule.curve;
        if !curve.ideal_min.is_finite() || !curve.ideal_max.is_finite() {
            return Err(ConfigError::invalid(field("curve"), "ideal band must be finite"));
        }
        if curve.ideal_min > curve.ideal_max {
            return Err(ConfigError::invalid(field("curve"), "ideal_min exceeds ideal_max"));
        }
        check_positive(&field("curve.falloff"), curve.falloff)?;

        if let Some(floor) = rule.floor {
            check_range(&field("floor"), floor, 0.0, 100.0)?;
        }
        if let Some(typical) = rule.typical {
            check_range(&field("typical"), typical, 0.0, 100.0)?;
        }
        Ok(())
    }

    fn validate_tiers(&self) -> Result<(), ConfigError> {
        let Some(last) = self.tiers.last() else {
            return Err(ConfigError::invalid("tiers", "table is empty"));
        };
        if last.min_score != 0.0 {
            return Err(ConfigError::invalid("tiers", "last tier must start at 0"));
        }

        let mut seen = HashSet::new();
        for (i, rule) in self.tiers.iter().enumerate() {
            check_range(&format!("tiers[{i}].min_score"), rule.min_score, 0.0, 100.0)?;
            if !seen.insert(rule.tier) {
                return Err(ConfigError::invalid(
                    format!("tiers[{i}].tier"),
                    format!("tier {} listed twice", rule.tier),
                ));
            }
            if i > 0 && rule.min_score >= self.tiers[i - 1].min_score {
                return Err(ConfigError::invalid(
                    format!("tiers[{i}].min_score"),
                    "thresholds must be strictly descending",
                ));
            }
        }
        Ok(())
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is outside [{min}, {max}]")))
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive and finite")))
    }
}

/// A non-empty list of non-blank strings.
fn check_texts(field: &str, texts: &[String]) -> Result<(), ConfigError> {
    if texts.is_empty() {
        return Err(ConfigError::invalid(field, "list is empty"));
    }
    if texts.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::invalid(field, "templates must not be empty"));
    }
    Ok(())
}

fn check_ideals(field: &str, ideals: &[NamedRatio]) -> Result<(), ConfigError> {
    if ideals.is_empty() {
        return Err(ConfigError::invalid(field, "table is empty"));
    }
    for ideal in ideals {
        check_positive(&format!("{field}.{}", ideal.name), ideal.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(config: &EngineConfig) -> String {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_builtin_config_is_valid() {
        let config = EngineConfig::builtin().unwrap();
        assert_eq!(config.tiers.len(), 10);
        assert_eq!(config.tiers[0].tier, Tier::Sss);
        assert_eq!(config.tiers[9].tier, Tier::G);
        assert_eq!(config.proportions.ideals.len(), 3);
        assert_eq!(config.philtrum_chin.ideals.len(), 2);
        for kind in MetricKind::ALL {
            assert!(config.metrics.get(kind).weight > 0.0, "{kind} has no weight");
            assert!(!config.catalog.get(kind).advice.needs_improvement.is_empty());
        }
    }

    #[test]
    fn test_toml_round_trip_preserves_config() {
        let config = EngineConfig::builtin().unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut config = EngineConfig::builtin().unwrap();
        config.metrics.get_mut(MetricKind::Vline).weight = -1.0;
        assert_eq!(invalid_field(&config), "metrics.vline.weight");
    }

    #[test]
    fn test_rejects_all_zero_weights() {
        let mut config = EngineConfig::builtin().unwrap();
        for kind in MetricKind::ALL {
            config.metrics.get_mut(kind).weight = 0.0;
        }
        assert_eq!(invalid_field(&config), "metrics");
    }

    #[test]
    fn test_rejects_inverted_curve() {
        let mut config = EngineConfig::builtin().unwrap();
        let curve = &mut config.metrics.get_mut(MetricKind::Eline).curve;
        curve.ideal_min = 5.0;
        curve.ideal_max = -5.0;
        assert_eq!(invalid_field(&config), "metrics.eline.curve");
    }

    #[test]
    fn test_rejects_zero_falloff() {
        let mut config = EngineConfig::builtin().unwrap();
        config.metrics.get_mut(MetricKind::Symmetry).curve.falloff = 0.0;
        assert_eq!(invalid_field(&config), "metrics.symmetry.curve.falloff");
    }

    #[test]
    fn test_rejects_unordered_tiers() {
        let mut config = EngineConfig::builtin().unwrap();
        config.tiers.swap(2, 3);
        assert_eq!(invalid_field(&config), "tiers[3].min_score");
    }

    #[test]
    fn test_rejects_tier_table_without_floor() {
        let mut config = EngineConfig::builtin().unwrap();
        config.tiers.pop();
        assert_eq!(invalid_field(&config), "tiers");
    }

    #[test]
    fn test_rejects_weak_above_strong() {
        let mut config = EngineConfig::builtin().unwrap();
        config.explanation.weak_threshold = 90.0;
        assert_eq!(invalid_field(&config), "explanation.weak_threshold");
    }

    #[test]
    fn test_rejects_empty_ideal_table() {
        let mut config = EngineConfig::builtin().unwrap();
        config.philtrum_chin.ideals.clear();
        assert_eq!(invalid_field(&config), "philtrum_chin.ideals");
    }

    #[test]
    fn test_rejects_empty_catalog_text() {
        for (name, field) in [
            ("strong", "catalog.vline.strong"),
            ("weak", "catalog.vline.weak"),
            ("suggestion", "catalog.vline.suggestion"),
        ] {
            let mut config = EngineConfig::builtin().unwrap();
            let entry = config.catalog.get_mut(MetricKind::Vline);
            match name {
                "strong" => entry.strong.clear(),
                "weak" => entry.weak = "  ".into(),
                _ => entry.suggestion.clear(),
            }
            assert_eq!(invalid_field(&config), field);
        }
    }

    #[test]
    fn test_rejects_missing_advice_templates() {
        let mut config = EngineConfig::builtin().unwrap();
        config.catalog.get_mut(MetricKind::Vline).advice = AdviceTemplates::default();
        assert_eq!(invalid_field(&config), "catalog.vline.advice.needs_improvement");

        let mut config = EngineConfig::builtin().unwrap();
        config
            .catalog
            .get_mut(MetricKind::Eline)
            .advice
            .standard
            .push(String::new());
        assert_eq!(invalid_field(&config), "catalog.eline.advice.standard");
    }

    #[test]
    fn test_rejects_empty_general_advice() {
        let mut config = EngineConfig::builtin().unwrap();
        config.general_advice.clear();
        assert_eq!(invalid_field(&config), "general_advice");

        let mut config = EngineConfig::builtin().unwrap();
        config.general_advice.push(" ".into());
        assert_eq!(invalid_field(&config), "general_advice");
    }

    #[test]
    fn test_missing_advice_table_fails_to_load() {
        let config = EngineConfig::builtin().unwrap();
        let text = config.to_toml_string().unwrap();
        let mut doc: toml::Table = toml::from_str(&text).unwrap();
        doc.get_mut("catalog")
            .and_then(toml::Value::as_table_mut)
            .and_then(|c| c.get_mut("vline"))
            .and_then(toml::Value::as_table_mut)
            .unwrap()
            .remove("advice");
        let broken = toml::to_string(&doc).unwrap();
        assert!(matches!(
            EngineConfig::from_toml_str(&broken),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_missing_metric_rule_is_parse_error() {
        let config = EngineConfig::builtin().unwrap();
        let text = config.to_toml_string().unwrap();
        let mut doc: toml::Table = toml::from_str(&text).unwrap();
        doc.get_mut("metrics")
            .and_then(toml::Value::as_table_mut)
            .unwrap()
            .remove("vline");
        let broken = toml::to_string(&doc).unwrap();
        assert!(matches!(
            EngineConfig::from_toml_str(&broken),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/mien.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_per_metric_overrides() {
        let mut config = EngineConfig::builtin().unwrap();
        config.metrics.get_mut(MetricKind::Symmetry).floor = Some(50.0);
        config.metrics.get_mut(MetricKind::Symmetry).typical = Some(80.0);
        assert_eq!(config.floor(MetricKind::Symmetry), 50.0);
        assert_eq!(config.floor(MetricKind::Vline), config.severe_floor);
        assert_eq!(config.typical(MetricKind::Symmetry), 80.0);
        assert_eq!(config.typical(MetricKind::Vline), config.explanation.typical_score);
    }
}
