//! Composite scoring: weighted aggregation, tier resolution and severe-flaw
//! detection.

use crate::config::{EngineConfig, TierRule};
use crate::evaluate::MetricSummary;
use crate::explain::ExplanationDetails;
use crate::geometry::round_to;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Letter grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Sss,
    Ss,
    S,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Sss => "SSS",
            Tier::Ss => "SS",
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::E => "E",
            Tier::F => "F",
            Tier::G => "G",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    /// Weighted overall score in [0, 100], one decimal.
    pub score: f64,
    pub tier: Tier,
    pub level: String,
    pub description: String,
    pub emoji: String,
    /// Every metric's sub-score, including low-confidence ones.
    pub detailed_scores: BTreeMap<String, f64>,
    /// Human-readable "score (weight N%)" per metric.
    pub score_breakdown: BTreeMap<String, String>,
    /// Metrics below their hard floor, in canonical order.
    pub severe_flaws: Vec<String>,
    pub explanation_details: ExplanationDetails,
    pub note: String,
}

/// First rule, scanning from the highest threshold down, whose threshold
/// `score` reaches.
pub fn resolve_tier(score: f64, tiers: &[TierRule]) -> Option<&TierRule> {
    tiers.iter().find(|rule| score >= rule.min_score)
}

/// Aggregate evaluated metrics into a composite score. Explanation details
/// are left empty for [`explain`](crate::explain::explain) to fill.
pub fn score(summaries: &[MetricSummary], config: &EngineConfig) -> CompositeScore {
    let mut ordered = summaries.to_vec();
    ordered.sort_by_key(|s| s.kind);

    let effective_weight = |s: &MetricSummary| {
        let weight = config.metrics.get(s.kind).weight;
        if s.low_confidence {
            weight * config.pose.low_confidence_weight
        } else {
            weight
        }
    };

    let total_weight: f64 = ordered.iter().map(effective_weight).sum();
    let overall = if total_weight > 0.0 {
        ordered.iter().map(|s| effective_weight(s) * s.score).sum::<f64>() / total_weight
    } else if ordered.is_empty() {
        0.0
    } else {
        ordered.iter().map(|s| s.score).sum::<f64>() / ordered.len() as f64
    };
    let overall = round_to(overall.clamp(0.0, 100.0), 1);

    let mut detailed_scores = BTreeMap::new();
    let mut score_breakdown = BTreeMap::new();
    let mut severe_flaws = Vec::new();
    for s in &ordered {
        let share = if total_weight > 0.0 {
            effective_weight(s) / total_weight * 100.0
        } else {
            100.0 / ordered.len() as f64
        };
        detailed_scores.insert(s.kind.to_string(), s.score);
        score_breakdown.insert(
            s.kind.to_string(),
            format!("{:.1} (weight {:.0}%)", s.score, share),
        );
        if s.score < config.floor(s.kind) {
            severe_flaws.push(s.kind.to_string());
        }
    }

    let (tier, level, description, emoji) = match resolve_tier(overall, &config.tiers) {
        Some(rule) => (
            rule.tier,
            rule.level.clone(),
            rule.description.clone(),
            rule.emoji.clone(),
        ),
        None => (Tier::G, String::new(), String::new(), String::new()),
    };

    CompositeScore {
        score: overall,
        tier,
        level,
        description,
        emoji,
        detailed_scores,
        score_breakdown,
        severe_flaws,
        explanation_details: ExplanationDetails::default(),
        note: config.disclaimer.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::Status;
    use crate::metrics::MetricKind;

    fn summaries(score: f64) -> Vec<MetricSummary> {
        MetricKind::ALL
            .iter()
            .map(|&kind| MetricSummary {
                kind,
                score,
                status: Status::Ideal,
                low_confidence: false,
            })
            .collect()
    }

    fn with_score(mut all: Vec<MetricSummary>, kind: MetricKind, score: f64) -> Vec<MetricSummary> {
        for s in &mut all {
            if s.kind == kind {
                s.score = score;
                s.status = Status::NeedsImprovement;
            }
        }
        all
    }

    #[test]
    fn test_tier_boundaries() {
        let config = EngineConfig::builtin().unwrap();
        let cases = [
            (100.0, Tier::Sss),
            (95.0, Tier::Sss),
            (94.9, Tier::Ss),
            (90.0, Tier::Ss),
            (85.0, Tier::S),
            (80.0, Tier::A),
            (75.0, Tier::B),
            (70.0, Tier::C),
            (65.0, Tier::D),
            (60.0, Tier::E),
            (50.0, Tier::F),
            (49.9, Tier::G),
            (0.0, Tier::G),
        ];
        for (score, tier) in cases {
            assert_eq!(resolve_tier(score, &config.tiers).unwrap().tier, tier, "score {score}");
        }
    }

    #[test]
    fn test_exactly_one_tier_per_score() {
        let config = EngineConfig::builtin().unwrap();
        for tenth in 0..=1000 {
            let score = tenth as f64 / 10.0;
            let matching = config
                .tiers
                .iter()
                .enumerate()
                .filter(|(i, rule)| {
                    let upper = if *i == 0 { f64::INFINITY } else { config.tiers[i - 1].min_score };
                    score >= rule.min_score && score < upper
                })
                .count();
            assert_eq!(matching, 1, "score {score}");
        }
    }

    #[test]
    fn test_uniform_scores_average_to_themselves() {
        let config = EngineConfig::builtin().unwrap();
        let c = score(&summaries(72.5), &config);
        assert_eq!(c.score, 72.5);
        assert_eq!(c.tier, Tier::C);
        assert_eq!(c.detailed_scores.len(), 10);
        assert!(c.severe_flaws.is_empty());
        assert_eq!(c.note, config.disclaimer);
    }

    #[test]
    fn test_severe_flaw_survives_high_composite() {
        let config = EngineConfig::builtin().unwrap();
        let all = with_score(summaries(100.0), MetricKind::Symmetry, 10.0);
        let c = score(&all, &config);
        assert!(c.score >= 90.0, "score = {}", c.score);
        assert_eq!(c.severe_flaws, vec!["symmetry".to_string()]);
        assert_eq!(c.detailed_scores["symmetry"], 10.0);
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        let config = EngineConfig::builtin().unwrap();
        let mut doubled = config.clone();
        for kind in MetricKind::ALL {
            doubled.metrics.get_mut(kind).weight *= 2.0;
        }
        let all = with_score(summaries(90.0), MetricKind::FacialHarmony, 40.0);
        assert_eq!(score(&all, &config).score, score(&all, &doubled).score);
    }

    #[test]
    fn test_low_confidence_is_down_weighted_not_dropped() {
        let config = EngineConfig::builtin().unwrap();
        let mut all = with_score(summaries(90.0), MetricKind::Symmetry, 40.0);
        let full = score(&all, &config).score;
        for s in &mut all {
            if s.kind == MetricKind::Symmetry {
                s.low_confidence = true;
            }
        }
        let damped = score(&all, &config);
        assert!(damped.score > full);
        assert_eq!(damped.detailed_scores["symmetry"], 40.0);
        assert!(damped.severe_flaws.is_empty());
    }

    #[test]
    fn test_zero_weights_fall_back_to_plain_mean() {
        let mut config = EngineConfig::builtin().unwrap();
        for kind in MetricKind::ALL {
            config.metrics.get_mut(kind).weight = 0.0;
        }
        let all = with_score(summaries(80.0), MetricKind::Vline, 60.0);
        assert_eq!(score(&all, &config).score, 78.0);
    }

    #[test]
    fn test_breakdown_format() {
        let config = EngineConfig::builtin().unwrap();
        let c = score(&summaries(85.0), &config);
        assert_eq!(c.score_breakdown["facial_harmony"], "85.0 (weight 22%)");
        assert_eq!(c.score_breakdown["face_angle"], "85.0 (weight 3%)");
    }

    #[test]
    fn test_tier_serializes_as_letters() {
        assert_eq!(serde_json::to_string(&Tier::Sss).unwrap(), "\"SSS\"");
        assert_eq!(serde_json::to_string(&Tier::A).unwrap(), "\"A\"");
        let parsed: Tier = serde_json::from_str("\"SS\"").unwrap();
        assert_eq!(parsed, Tier::Ss);
    }
}
