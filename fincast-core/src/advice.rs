//! Threshold-triggered spending tips.

use crate::allocate::BudgetSuggestion;
use std::collections::HashMap;

/// Peer averages at or below this are not compared against.
const PEER_EPSILON: f64 = 1e-6;
/// Percent deviation beyond which a comparison tip fires.
const DEVIATION_THRESHOLD_PCT: f64 = 10.0;
/// Multiple of the mean category total beyond which an overspend tip fires.
const OVERSPEND_FACTOR: f64 = 1.5;

/// Compare the user's allocation against the peer-group averages and emit a
/// tip per category deviating more than ±10%. Categories absent from the
/// peer comparison stay silent.
pub fn comparison_tips(
    allocation: &[BudgetSuggestion],
    peer_averages: &HashMap<String, f64>,
) -> Vec<String> {
    let mut tips = Vec::new();
    for suggestion in allocation {
        let Some(&peer_avg) = peer_averages.get(&suggestion.category) else {
            continue;
        };
        if peer_avg <= PEER_EPSILON {
            continue;
        }
        let deviation = (suggestion.recommended_limit - peer_avg) / peer_avg * 100.0;
        if deviation > DEVIATION_THRESHOLD_PCT {
            tips.push(format!(
                "Your planned {} spending is {:.0}% higher than similar users.",
                suggestion.category, deviation
            ));
        } else if deviation < -DEVIATION_THRESHOLD_PCT {
            tips.push(format!(
                "Your planned {} spending is {:.0}% lower than similar users.",
                suggestion.category, -deviation
            ));
        }
    }
    tips
}

/// Flag categories whose historical total runs well above the user's own
/// per-category mean.
pub fn overspend_tips(category_totals: &HashMap<String, f64>) -> Vec<String> {
    if category_totals.is_empty() {
        return Vec::new();
    }
    let mean = category_totals.values().sum::<f64>() / category_totals.len() as f64;
    let mut high: Vec<&String> = category_totals
        .iter()
        .filter(|(_, total)| **total > OVERSPEND_FACTOR * mean)
        .map(|(category, _)| category)
        .collect();
    high.sort();
    high.into_iter()
        .map(|category| format!("Consider reducing spending in {category}."))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation(pairs: &[(&str, f64)]) -> Vec<BudgetSuggestion> {
        pairs
            .iter()
            .map(|(category, limit)| BudgetSuggestion {
                category: category.to_string(),
                recommended_limit: *limit,
            })
            .collect()
    }

    fn averages(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(c, v)| (c.to_string(), *v)).collect()
    }

    #[test]
    fn test_higher_than_peers_tip() {
        let tips = comparison_tips(&allocation(&[("food", 200.0)]), &averages(&[("food", 100.0)]));
        assert_eq!(tips.len(), 1);
        assert!(tips[0].contains("food"));
        assert!(tips[0].contains("100% higher"), "got: {}", tips[0]);
    }

    #[test]
    fn test_lower_than_peers_tip() {
        let tips = comparison_tips(&allocation(&[("food", 50.0)]), &averages(&[("food", 100.0)]));
        assert_eq!(tips.len(), 1);
        assert!(tips[0].contains("50% lower"), "got: {}", tips[0]);
    }

    #[test]
    fn test_within_threshold_is_silent() {
        let tips = comparison_tips(&allocation(&[("food", 105.0)]), &averages(&[("food", 100.0)]));
        assert!(tips.is_empty());
    }

    #[test]
    fn test_tiny_peer_average_is_skipped() {
        let tips = comparison_tips(&allocation(&[("food", 100.0)]), &averages(&[("food", 1e-9)]));
        assert!(tips.is_empty());
    }

    #[test]
    fn test_category_missing_from_peers_is_skipped() {
        let tips = comparison_tips(&allocation(&[("food", 100.0)]), &averages(&[("transport", 10.0)]));
        assert!(tips.is_empty());
    }

    #[test]
    fn test_overspend_tip_fires_above_factor() {
        let totals = averages(&[("food", 400.0), ("transport", 100.0), ("fun", 100.0)]);
        let tips = overspend_tips(&totals);
        assert_eq!(tips, vec!["Consider reducing spending in food.".to_string()]);
    }

    #[test]
    fn test_overspend_empty_totals() {
        assert!(overspend_tips(&HashMap::new()).is_empty());
    }
}
