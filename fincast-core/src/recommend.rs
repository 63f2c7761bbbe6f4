//! The request-scoped recommendation pipeline.
//!
//! One linear pass: validate → aggregate → fit → predict → allocate →
//! peer matrix → rank → tips. Each stage produces its normal output or the
//! defined fallback; the whole thing is recomputed per request.

use crate::advice::{comparison_tips, overspend_tips};
use crate::aggregate::{category_totals, monthly_totals};
use crate::allocate::{BudgetSuggestion, allocate_budget};
use crate::anomaly::{AnomalyFlag, flag_anomalies};
use crate::error::RecommendError;
use crate::forecast::fit_models;
use crate::matrix::{PeerSpending, SpendingMatrix};
use crate::similarity::rank_peers;
use crate::transaction::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Opaque tag for the algorithm combination behind a response.
pub const MODEL_VERSION: &str = "seasonal-svd-v1";

/// Everything the engine needs for one recommendation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationRequest {
    pub user_id: String,
    pub available_amount: f64,
    pub transactions: Vec<TransactionRecord>,
    pub all_user_data: Vec<PeerSpending>,
    /// Categories the caller wants covered even without any history.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommended_budgets: Vec<BudgetSuggestion>,
    pub comparison_tips: Vec<String>,
    pub saving_tips: Vec<String>,
    pub anomalies: Vec<AnomalyFlag>,
    pub model_version: String,
}

/// Run the full pipeline for one request.
///
/// The only caller-visible failure is a request with neither transactions
/// nor explicit categories; every degenerate input downstream falls back as
/// described on the individual stages.
pub fn recommend(
    request: &RecommendationRequest,
) -> Result<RecommendationResponse, RecommendError> {
    if request.transactions.is_empty() && request.categories.is_empty() {
        return Err(RecommendError::EmptyInput);
    }
    let available = request.available_amount.max(0.0);

    let aggregates = monthly_totals(&request.transactions);
    let models = fit_models(&aggregates);
    debug!(
        user_id = %request.user_id,
        aggregate_rows = aggregates.len(),
        models = models.len(),
        "fitted category models"
    );

    let predicted: HashMap<String, f64> = models
        .iter()
        .map(|(category, model)| (category.clone(), model.predict_next(model.next_calendar_month())))
        .collect();

    let budgets = allocate_budget(available, &predicted, &request.categories);

    let own_allocation: HashMap<String, f64> = budgets
        .iter()
        .map(|b| (b.category.clone(), b.recommended_limit))
        .collect();
    let matrix = SpendingMatrix::build(&request.all_user_data, &request.user_id, &own_allocation);
    let neighbors = rank_peers(&matrix, &request.user_id);
    debug!(
        users = matrix.user_ids.len(),
        categories = matrix.categories.len(),
        neighbors = neighbors.len(),
        "ranked similar peers"
    );

    let mut tips = Vec::new();
    if !neighbors.is_empty() {
        let rows: Vec<usize> = neighbors
            .iter()
            .filter_map(|score| matrix.row_of(&score.user_id))
            .collect();
        let peer_averages = matrix.column_means(&rows);
        tips = comparison_tips(&budgets, &peer_averages);
    }

    Ok(RecommendationResponse {
        recommended_budgets: budgets,
        comparison_tips: tips,
        saving_tips: overspend_tips(&category_totals(&aggregates)),
        anomalies: flag_anomalies(&request.transactions),
        model_version: MODEL_VERSION.to_string(),
    })
}
