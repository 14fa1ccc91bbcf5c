//! Explanation and advice selection.
//!
//! Buckets every metric into strong/weak/bonus/penalty lists and picks
//! advice templates for the weakest metrics from the configured catalog.
//! Output depends only on the summaries and configuration.

use crate::composite::CompositeScore;
use crate::config::{CatalogEntry, EngineConfig};
use crate::evaluate::{MetricSummary, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplanationDetails {
    pub strong_points: Vec<String>,
    pub weak_points: Vec<String>,
    pub bonus_factors: Vec<String>,
    pub penalty_factors: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub details: ExplanationDetails,
    pub advice: Vec<String>,
}

fn templates(entry: &CatalogEntry, status: Status) -> &[String] {
    let preferred = match status {
        Status::NeedsImprovement => &entry.advice.needs_improvement,
        Status::Standard => &entry.advice.standard,
        Status::Good | Status::Ideal => &entry.advice.good,
    };
    if preferred.is_empty() {
        &entry.advice.needs_improvement
    } else {
        preferred
    }
}

fn push_unique(list: &mut Vec<String>, item: &str, cap: usize) {
    if list.len() < cap && !list.iter().any(|s| s == item) {
        list.push(item.to_string());
    }
}

/// Classify metrics and select advice.
pub fn explain(
    summaries: &[MetricSummary],
    composite: &CompositeScore,
    config: &EngineConfig,
) -> Explanation {
    let ex = &config.explanation;
    let mut ordered = summaries.to_vec();
    ordered.sort_by_key(|s| s.kind);

    let mut details = ExplanationDetails::default();
    let mut candidates = Vec::new();

    for s in &ordered {
        let entry = config.catalog.get(s.kind);
        let typical = config.typical(s.kind);
        let strong = s.score >= ex.strong_threshold;
        let weak = s.score < ex.weak_threshold;

        if strong {
            details.strong_points.push(format!("{}: {}", entry.label, entry.strong));
        }
        if weak {
            details.weak_points.push(format!("{}: {}", entry.label, entry.weak));
        }

        let delta = s.score - typical;
        let penalty = delta <= -ex.bonus_margin;
        if delta >= ex.bonus_margin {
            details
                .bonus_factors
                .push(format!("{} is {:.1} points above typical", entry.label, delta));
        }
        if penalty {
            details
                .penalty_factors
                .push(format!("{} is {:.1} points below typical", entry.label, -delta));
        }

        let severe = composite.severe_flaws.iter().any(|f| f == s.kind.as_str());
        if !strong && (weak || penalty || severe) {
            candidates.push(s);
        }
    }

    // Most severe first; ties keep canonical order.
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.kind.cmp(&b.kind)));

    let mut advice = Vec::new();
    for s in &candidates {
        let entry = config.catalog.get(s.kind);
        push_unique(&mut details.improvement_suggestions, &entry.suggestion, ex.max_advice);
        for template in templates(entry, s.status) {
            push_unique(&mut advice, template, ex.max_advice);
        }
    }

    if advice.is_empty() {
        for template in &config.general_advice {
            push_unique(&mut advice, template, ex.max_advice);
        }
    }

    Explanation { details, advice }
}
