//! User × category spending matrix construction.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One peer's average monthly spend in one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeerSpending {
    pub user_id: String,
    pub category: String,
    pub average_spend: f64,
}

/// Fewer users than this and the comparison space is degenerate.
pub const MIN_USERS: usize = 3;
/// Fewer categories than this and the comparison space is degenerate.
pub const MIN_CATEGORIES: usize = 2;

/// Dense user × category matrix with stable, sorted row and column order.
///
/// The shape is fixed up front from the distinct user and category sets;
/// cells are then filled by index, with missing combinations at 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingMatrix {
    pub user_ids: Vec<String>,
    pub categories: Vec<String>,
    pub values: DMatrix<f64>,
}

impl SpendingMatrix {
    /// Pivot peer tuples into a dense matrix. When `user_id` is absent from
    /// the peer data, a row is appended from `own_allocation`, with matrix
    /// columns missing from the allocation at 0.0. Columns come from peer
    /// data only.
    pub fn build(
        peers: &[PeerSpending],
        user_id: &str,
        own_allocation: &HashMap<String, f64>,
    ) -> Self {
        let categories: Vec<String> = peers
            .iter()
            .map(|p| p.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut user_ids: Vec<String> = peers
            .iter()
            .map(|p| p.user_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_was_present = user_ids.iter().any(|u| u == user_id);
        if !user_was_present {
            user_ids.push(user_id.to_string());
        }

        let col_index: HashMap<&str, usize> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let row_index: HashMap<&str, usize> = user_ids
            .iter()
            .enumerate()
            .map(|(i, u)| (u.as_str(), i))
            .collect();

        let mut values = DMatrix::zeros(user_ids.len(), categories.len());
        for peer in peers {
            let (Some(&r), Some(&c)) = (
                row_index.get(peer.user_id.as_str()),
                col_index.get(peer.category.as_str()),
            ) else {
                continue;
            };
            values[(r, c)] = peer.average_spend;
        }

        if !user_was_present {
            let r = user_ids.len() - 1;
            for (c, category) in categories.iter().enumerate() {
                values[(r, c)] = own_allocation.get(category).copied().unwrap_or(0.0);
            }
        }

        Self {
            user_ids,
            categories,
            values,
        }
    }

    /// True when there is too little structure to compare users.
    pub fn is_degenerate(&self) -> bool {
        self.categories.len() < MIN_CATEGORIES || self.user_ids.len() < MIN_USERS
    }

    /// Row position of a user id.
    pub fn row_of(&self, user_id: &str) -> Option<usize> {
        self.user_ids.iter().position(|u| u == user_id)
    }

    /// Mean value per category across the given row indexes.
    pub fn column_means(&self, rows: &[usize]) -> HashMap<String, f64> {
        if rows.is_empty() {
            return HashMap::new();
        }
        self.categories
            .iter()
            .enumerate()
            .map(|(c, category)| {
                let sum: f64 = rows.iter().map(|&r| self.values[(r, c)]).sum();
                (category.clone(), sum / rows.len() as f64)
            })
            .collect()
    }
}
