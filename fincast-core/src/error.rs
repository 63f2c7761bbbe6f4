//! Engine error types.

use thiserror::Error;

/// Errors surfaced to the caller of the recommendation pipeline.
///
/// Everything else — short history, a degenerate peer matrix, malformed
/// transaction rows — degrades through a defined fallback instead of
/// failing the request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("no transactions and no categories supplied; nothing to recommend")]
    EmptyInput,
}
