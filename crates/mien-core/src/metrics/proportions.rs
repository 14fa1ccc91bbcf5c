//! Face height-to-width proportion against named ideal ratios.

use super::{nearest_ideal, Measurement, MetricKind, NamedRatio};
use crate::geometry::{round_to, safe_ratio};
use crate::landmarks::index;
use crate::normalize::NormalizedLandmarkSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proportions {
    /// Forehead-to-chin height over cheek-to-cheek width.
    pub aspect_ratio: f64,
    pub closest_ratio: String,
    pub ideal_ratio: f64,
    pub difference: f64,
}

impl Measurement for Proportions {
    const KIND: MetricKind = MetricKind::Proportions;

    fn primary_value(&self) -> f64 {
        self.difference
    }
}

pub fn extract(n: &NormalizedLandmarkSet, ideals: &[NamedRatio]) -> Proportions {
    let height = n.at(index::FOREHEAD_CENTER).distance(&n.at(index::CHIN_TIP));
    let width = n.at(index::LEFT_CHEEK).distance(&n.at(index::RIGHT_CHEEK));
    let aspect_ratio = safe_ratio(height, width, 0.0);

    let (closest_ratio, ideal_ratio, difference) = nearest_ideal(aspect_ratio, ideals);

    Proportions {
        aspect_ratio: round_to(aspect_ratio, 3),
        closest_ratio,
        ideal_ratio,
        difference: round_to(difference, 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures;

    fn ideals() -> Vec<NamedRatio> {
        vec![
            NamedRatio { name: "golden".into(), value: 1.618 },
            NamedRatio { name: "silver".into(), value: 1.414 },
            NamedRatio { name: "japanese".into(), value: 1.46 },
        ]
    }

    #[test]
    fn test_reference_is_closest_to_golden() {
        let p = extract(&fixtures::reference(), &ideals());
        // 3.35 / 2.16
        assert!((p.aspect_ratio - 1.551).abs() < 1e-9);
        assert_eq!(p.closest_ratio, "golden");
        assert_eq!(p.ideal_ratio, 1.618);
        assert!((p.difference - 0.067).abs() < 1e-9);
    }

    #[test]
    fn test_wide_face_moves_to_silver() {
        let mut n = fixtures::reference();
        n.points[index::LEFT_CHEEK].x *= 1.12;
        n.points[index::RIGHT_CHEEK].x *= 1.12;
        let p = extract(&n, &ideals());
        assert_eq!(p.closest_ratio, "silver");
    }
}
