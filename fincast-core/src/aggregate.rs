//! Monthly aggregation of raw transactions by category.

use crate::transaction::TransactionRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Total spend for one category within one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyAggregate {
    pub category: String,
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

/// Parse a payload date. Bank exports use either ISO or US ordering; a
/// trailing timestamp is ignored.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%m/%d/%Y"))
        .ok()
}

/// Group transactions into per-category monthly totals.
///
/// Rows whose date fails to parse are dropped, not surfaced. The result is
/// sorted by (year, month) ascending within each category; empty input
/// yields an empty set, which downstream stages read as "no history".
pub fn monthly_totals(transactions: &[TransactionRecord]) -> Vec<MonthlyAggregate> {
    let mut groups: HashMap<(String, i32, u32), f64> = HashMap::new();

    for txn in transactions {
        let Some(date) = parse_date(&txn.date) else {
            continue;
        };
        *groups
            .entry((txn.normalized_category(), date.year(), date.month()))
            .or_insert(0.0) += txn.amount;
    }

    let mut rows: Vec<MonthlyAggregate> = groups
        .into_iter()
        .map(|((category, year, month), total)| MonthlyAggregate {
            category,
            year,
            month,
            total,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then(a.year.cmp(&b.year))
            .then(a.month.cmp(&b.month))
    });
    rows
}

/// Total spend per category across all months.
pub fn category_totals(aggregates: &[MonthlyAggregate]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for row in aggregates {
        *totals.entry(row.category.clone()).or_insert(0.0) += row.total;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(category: &str, amount: f64, date: &str) -> TransactionRecord {
        TransactionRecord::new("t", category, amount, date)
    }

    #[test]
    fn test_groups_by_category_and_month() {
        let rows = monthly_totals(&[
            txn("food", 20.0, "2024-01-05"),
            txn("food", 30.0, "2024-01-20"),
            txn("food", 15.0, "2024-02-01"),
            txn("transport", 10.0, "2024-01-09"),
        ]);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "food");
        assert_eq!((rows[0].year, rows[0].month, rows[0].total), (2024, 1, 50.0));
        assert_eq!((rows[1].year, rows[1].month, rows[1].total), (2024, 2, 15.0));
        assert_eq!(rows[2].category, "transport");
    }

    #[test]
    fn test_unparseable_dates_dropped() {
        let rows = monthly_totals(&[
            txn("food", 20.0, "yesterday"),
            txn("food", 30.0, ""),
            txn("food", 5.0, "2024-13-40"),
        ]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_us_date_format_and_timestamp_suffix() {
        let rows = monthly_totals(&[
            txn("food", 20.0, "03/15/2024"),
            txn("food", 5.0, "2024-03-01T09:30:00"),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].year, rows[0].month, rows[0].total), (2024, 3, 25.0));
    }

    #[test]
    fn test_sorted_across_year_boundary() {
        let rows = monthly_totals(&[
            txn("food", 1.0, "2024-01-01"),
            txn("food", 2.0, "2023-12-01"),
            txn("food", 3.0, "2023-11-01"),
        ]);
        let order: Vec<(i32, u32)> = rows.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(order, vec![(2023, 11), (2023, 12), (2024, 1)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(monthly_totals(&[]).is_empty());
        assert!(category_totals(&[]).is_empty());
    }

    #[test]
    fn test_category_totals_sums_months() {
        let rows = monthly_totals(&[
            txn("food", 20.0, "2024-01-05"),
            txn("food", 30.0, "2024-02-05"),
        ]);
        let totals = category_totals(&rows);
        assert_eq!(totals["food"], 50.0);
    }
}
