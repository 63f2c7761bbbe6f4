//! Peer similarity over standardized, SVD-reduced spending vectors.

use crate::matrix::SpendingMatrix;
use nalgebra::{DMatrix, RowDVector};
use serde::{Deserialize, Serialize};

/// Number of nearest peers kept for comparison.
pub const TOP_PEERS: usize = 5;
/// Upper bound on latent dimensions for the reduced comparison space.
const LATENT_DIMS: usize = 5;

/// Cosine similarity of one peer to the requesting user, in [-1, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityScore {
    pub user_id: String,
    pub score: f64,
}

/// Standardize each column to zero mean and unit variance, so high-magnitude
/// categories do not dominate the comparison. Zero-variance columns collapse
/// to 0.0.
fn standardize(values: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = values.clone();
    let n = values.nrows() as f64;
    for c in 0..values.ncols() {
        let col = values.column(c);
        let mean = col.sum() / n;
        let variance = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let sd = variance.sqrt();
        for r in 0..values.nrows() {
            out[(r, c)] = if sd > 0.0 {
                (values[(r, c)] - mean) / sd
            } else {
                0.0
            };
        }
    }
    out
}

/// Variance-preserving projection of the rows into at most `k` latent
/// dimensions: the narrow seam around the numeric primitive. Matrix in,
/// lower-rank row embedding out (X · Vₖ from the SVD).
fn latent_embedding(standardized: &DMatrix<f64>, k: usize) -> DMatrix<f64> {
    let svd = standardized.clone().svd(false, true);
    let Some(v_t) = svd.v_t else {
        return standardized.clone();
    };
    let k = k.clamp(1, v_t.nrows());
    standardized * v_t.rows(0, k).transpose()
}

/// Cosine similarity, defined as 0.0 when either vector has zero norm.
fn cosine(a: &RowDVector<f64>, b: &RowDVector<f64>) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    a.dot(b) / (norm_a * norm_b)
}

/// Rank every other user by cosine similarity to `user_id` in latent space,
/// returning the top [`TOP_PEERS`] descending.
///
/// Empty when the matrix is degenerate or the user has no row: similarity
/// then contributes nothing downstream.
pub fn rank_peers(matrix: &SpendingMatrix, user_id: &str) -> Vec<SimilarityScore> {
    if matrix.is_degenerate() {
        return Vec::new();
    }
    let Some(user_row) = matrix.row_of(user_id) else {
        return Vec::new();
    };

    let standardized = standardize(&matrix.values);
    let k = LATENT_DIMS.min(matrix.categories.len().saturating_sub(1)).max(1);
    let embedding = latent_embedding(&standardized, k);

    let target = embedding.row(user_row).clone_owned();
    let mut scores: Vec<SimilarityScore> = matrix
        .user_ids
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != user_row)
        .map(|(i, id)| SimilarityScore {
            user_id: id.clone(),
            score: cosine(&target, &embedding.row(i).clone_owned()),
        })
        .collect();

    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
    scores.truncate(TOP_PEERS);
    scores
}
