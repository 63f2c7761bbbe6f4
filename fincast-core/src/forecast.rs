//! Seasonal-trend forecasting, one model per category.
//!
//! A deliberately small model for a small-sample regime: sine/cosine of the
//! calendar month capture a repeating yearly pattern, a linear time index
//! captures the long-run trend. Anything richer overfits on a handful of
//! monthly totals.

use crate::aggregate::MonthlyAggregate;
use crate::round2;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Minimum distinct (year, month) rows before a category gets a model.
pub const MIN_HISTORY_MONTHS: usize = 3;

/// Singular values below this are treated as zero when solving the fit.
const SVD_EPS: f64 = 1e-10;

/// Fitted coefficients for one category:
/// `total ≈ sin_coef·sin(2πm/12) + cos_coef·cos(2πm/12) + trend_coef·t + intercept`
///
/// Immutable once fit; the per-request model map owns all of these.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryModel {
    pub sin_coef: f64,
    pub cos_coef: f64,
    pub trend_coef: f64,
    pub intercept: f64,
    /// Month offset of the most recent observation.
    pub last_time_index: i64,
    /// Calendar month (1-12) of the most recent observation.
    pub last_calendar_month: u32,
}

fn seasonal_features(month: u32) -> (f64, f64) {
    let angle = 2.0 * PI * f64::from(month) / 12.0;
    (angle.sin(), angle.cos())
}

impl CategoryModel {
    /// Evaluate the model for `next_month` (calendar month 1-12) at the time
    /// index one past the last observation. Clamped to ≥ 0 and rounded to 2
    /// decimals.
    pub fn predict_next(&self, next_month: u32) -> f64 {
        let (sin_m, cos_m) = seasonal_features(next_month);
        let t = (self.last_time_index + 1) as f64;
        let raw = self.sin_coef * sin_m + self.cos_coef * cos_m + self.trend_coef * t + self.intercept;
        round2(raw.max(0.0))
    }

    /// The calendar month immediately after the last observation.
    pub fn next_calendar_month(&self) -> u32 {
        self.last_calendar_month % 12 + 1
    }
}

/// Fit one model per category holding at least [`MIN_HISTORY_MONTHS`]
/// aggregate rows. Categories with shorter history are simply absent from
/// the returned map; the allocator supplies their fallback.
pub fn fit_models(aggregates: &[MonthlyAggregate]) -> HashMap<String, CategoryModel> {
    let mut by_category: HashMap<&str, Vec<&MonthlyAggregate>> = HashMap::new();
    for row in aggregates {
        by_category.entry(&row.category).or_default().push(row);
    }

    let mut models = HashMap::new();
    for (category, rows) in by_category {
        if rows.len() < MIN_HISTORY_MONTHS {
            continue;
        }
        if let Some(model) = fit_one(&rows) {
            models.insert(category.to_string(), model);
        }
    }
    models
}

/// Ordinary least squares on `[sin, cos, t, 1]` via SVD. Rank-deficient
/// designs (e.g. the same calendar month every year) get the minimum-norm
/// solution.
fn fit_one(rows: &[&MonthlyAggregate]) -> Option<CategoryModel> {
    let min_year = rows.iter().map(|r| r.year).min()?;

    let n = rows.len();
    let mut x = DMatrix::zeros(n, 4);
    let mut y = DVector::zeros(n);
    let mut last_t = i64::MIN;
    let mut last_month = 0u32;

    for (i, row) in rows.iter().enumerate() {
        let (sin_m, cos_m) = seasonal_features(row.month);
        let t = i64::from(row.year - min_year) * 12 + (i64::from(row.month) - 1);
        x[(i, 0)] = sin_m;
        x[(i, 1)] = cos_m;
        x[(i, 2)] = t as f64;
        x[(i, 3)] = 1.0;
        y[i] = row.total;
        if t > last_t {
            last_t = t;
            last_month = row.month;
        }
    }

    let svd = x.svd(true, true);
    let coefs = svd.solve(&y, SVD_EPS).ok()?;

    Some(CategoryModel {
        sin_coef: coefs[0],
        cos_coef: coefs[1],
        trend_coef: coefs[2],
        intercept: coefs[3],
        last_time_index: last_t,
        last_calendar_month: last_month,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(category: &str, year: i32, month: u32, total: f64) -> MonthlyAggregate {
        MonthlyAggregate {
            category: category.to_string(),
            year,
            month,
            total,
        }
    }

    #[test]
    fn test_two_months_is_not_enough() {
        let models = fit_models(&[agg("food", 2024, 1, 100.0), agg("food", 2024, 2, 120.0)]);
        assert!(!models.contains_key("food"));
    }

    #[test]
    fn test_three_months_always_fits() {
        let models = fit_models(&[
            agg("food", 2024, 1, 50.0),
            agg("food", 2024, 2, 60.0),
            agg("food", 2024, 3, 70.0),
        ]);
        let model = &models["food"];
        assert_eq!(model.last_time_index, 2);
        assert_eq!(model.last_calendar_month, 3);
        assert_eq!(model.next_calendar_month(), 4);
        assert!(model.predict_next(4) >= 0.0);
    }

    #[test]
    fn test_yearly_history_predicts_in_range() {
        // Same calendar month across four years; the min-norm fit lands the
        // next-month prediction between the observed extremes.
        let models = fit_models(&[
            agg("food", 2021, 1, 100.0),
            agg("food", 2022, 1, 120.0),
            agg("food", 2023, 1, 110.0),
            agg("food", 2024, 1, 130.0),
        ]);
        let model = &models["food"];
        assert_eq!(model.last_time_index, 36);
        assert_eq!(model.next_calendar_month(), 2);

        let predicted = model.predict_next(2);
        assert!(
            (100.0..150.0).contains(&predicted),
            "prediction {predicted} out of range"
        );
    }

    #[test]
    fn test_declining_series_clamps_to_zero() {
        let models = fit_models(&[
            agg("subs", 2024, 1, 90.0),
            agg("subs", 2024, 2, 60.0),
            agg("subs", 2024, 3, 30.0),
            agg("subs", 2024, 4, 5.0),
        ]);
        assert_eq!(models["subs"].predict_next(5), 0.0);
    }

    #[test]
    fn test_flat_series_predicts_flat() {
        let models = fit_models(&[
            agg("rent", 2024, 1, 400.0),
            agg("rent", 2024, 2, 400.0),
            agg("rent", 2024, 3, 400.0),
            agg("rent", 2024, 4, 400.0),
        ]);
        let predicted = models["rent"].predict_next(5);
        assert!((predicted - 400.0).abs() < 1.0, "got {predicted}");
    }

    #[test]
    fn test_december_wraps_to_january() {
        let model = CategoryModel {
            sin_coef: 0.0,
            cos_coef: 0.0,
            trend_coef: 0.0,
            intercept: 10.0,
            last_time_index: 11,
            last_calendar_month: 12,
        };
        assert_eq!(model.next_calendar_month(), 1);
    }

    #[test]
    fn test_each_category_gets_its_own_model() {
        let models = fit_models(&[
            agg("food", 2024, 1, 50.0),
            agg("food", 2024, 2, 60.0),
            agg("food", 2024, 3, 70.0),
            agg("transport", 2024, 1, 10.0),
            agg("transport", 2024, 2, 10.0),
        ]);
        assert!(models.contains_key("food"));
        assert!(!models.contains_key("transport"));
        assert_eq!(models.len(), 1);
    }
}
