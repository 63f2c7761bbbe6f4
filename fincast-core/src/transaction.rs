//! Transaction records as they arrive on the wire.

use serde::{Deserialize, Deserializer, Serialize};

/// A raw transaction from the request payload.
///
/// The date stays a string here; the aggregator parses it and drops rows it
/// cannot read. Amounts accept JSON numbers or numeric strings, and anything
/// unparseable (or non-finite) coerces to 0.0 rather than failing the
/// request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub date: String,
}

impl TransactionRecord {
    /// Create a new record
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            amount,
            date: date.into(),
        }
    }

    /// Trimmed category name; empty falls back to "uncategorized".
    pub fn normalized_category(&self) -> String {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            "uncategorized".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let amount = match Raw::deserialize(deserializer)? {
        Raw::Num(n) if n.is_finite() => n,
        Raw::Num(_) => 0.0,
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        Raw::Other(_) => 0.0,
    };
    Ok(amount)
}
