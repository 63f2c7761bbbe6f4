//! Outlier transaction flagging on log-scaled amounts.

use crate::transaction::TransactionRecord;
use serde::{Deserialize, Serialize};

/// Minimum transaction count before outlier statistics are meaningful.
pub const MIN_SAMPLES: usize = 10;
const Z_THRESHOLD: f64 = 3.0;

/// A transaction whose amount sits far outside the user's usual range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyFlag {
    pub transaction_id: String,
    pub amount: f64,
}

/// Flag transactions whose `ln(1 + |amount|)` deviates from the mean by more
/// than three standard deviations. Fewer than [`MIN_SAMPLES`] transactions,
/// or a zero spread, yields no flags.
pub fn flag_anomalies(transactions: &[TransactionRecord]) -> Vec<AnomalyFlag> {
    if transactions.len() < MIN_SAMPLES {
        return Vec::new();
    }

    let scaled: Vec<f64> = transactions
        .iter()
        .map(|t| (1.0 + t.amount.abs()).ln())
        .collect();
    let n = scaled.len() as f64;
    let mean = scaled.iter().sum::<f64>() / n;
    let sd = (scaled.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    if sd == 0.0 {
        return Vec::new();
    }

    transactions
        .iter()
        .zip(scaled)
        .filter_map(|(txn, value)| {
            if ((value - mean) / sd).abs() > Z_THRESHOLD {
                Some(AnomalyFlag {
                    transaction_id: txn.id.clone(),
                    amount: txn.amount,
                })
            } else {
                None
            }
        })
        .collect()
}
