//! Budget allocation from predicted category spend.

use crate::round2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recommended monthly limit for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSuggestion {
    pub category: String,
    pub recommended_limit: f64,
}

/// Split `available` across categories in proportion to predicted spend.
///
/// Every requested category is guaranteed an entry (default 0.0). With no
/// signal at all — an empty or non-positive predicted sum — the split is
/// equal across whichever categories exist. Proportional allocation keeps
/// the forecast's relative shape while respecting the ceiling `available`.
/// All limits are rounded to 2 decimals; output is sorted by category.
pub fn allocate_budget(
    available: f64,
    predicted: &HashMap<String, f64>,
    requested: &[String],
) -> Vec<BudgetSuggestion> {
    let mut predicted = predicted.clone();
    for category in requested {
        predicted.entry(category.clone()).or_insert(0.0);
    }

    let mut categories: Vec<&String> = predicted.keys().collect();
    categories.sort();
    if categories.is_empty() {
        return Vec::new();
    }

    let total_predicted: f64 = predicted.values().sum();
    if total_predicted <= 0.0 {
        let share = round2(available / categories.len() as f64);
        return categories
            .into_iter()
            .map(|category| BudgetSuggestion {
                category: category.clone(),
                recommended_limit: share,
            })
            .collect();
    }

    categories
        .into_iter()
        .map(|category| BudgetSuggestion {
            category: category.clone(),
            recommended_limit: round2(available * predicted[category] / total_predicted),
        })
        .collect()
}

/// The simpler, non-core allocation variant: 90% of each observed category
/// total, floored at 1.0.
pub fn trimmed_limits(category_totals: &HashMap<String, f64>) -> Vec<BudgetSuggestion> {
    let mut suggestions: Vec<BudgetSuggestion> = category_totals
        .iter()
        .map(|(category, total)| BudgetSuggestion {
            category: category.clone(),
            recommended_limit: round2(total * 0.9).max(1.0),
        })
        .collect();
    suggestions.sort_by(|a, b| a.category.cmp(&b.category));
    suggestions
}
