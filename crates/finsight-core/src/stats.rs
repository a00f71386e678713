//! Small numeric helpers shared by the analytics engines
//!
//! Variance and standard deviation are population forms (divide by n), which
//! is what the score formulas downstream assume. All helpers return 0.0 for
//! empty input instead of erroring; callers that need a minimum sample size
//! enforce it themselves.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::models::Transaction;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Percentile with linear interpolation between closest ranks
///
/// `q` is in [0, 100]. Matches the usual numeric-library definition: the
/// rank is `q / 100 * (n - 1)` and fractional ranks interpolate.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

pub fn z_score(value: f64, mean: f64, std_dev: f64) -> f64 {
    (value - mean) / std_dev
}

/// Slope of the least-squares line through `values` at x = 0, 1, 2, ...
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }
    let sum_x = (n - 1.0) * n / 2.0;
    let sum_x2 = (n - 1.0) * n * (2.0 * n - 1.0) / 6.0;
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
    let denom = n * sum_x2 - sum_x * sum_x;
    if denom == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denom
}

pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Z-score each column; constant columns become all zeros
pub fn z_normalize(mut rows: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    if rows.is_empty() {
        return rows;
    }
    for d in 0..rows[0].len() {
        let column: Vec<f64> = rows.iter().map(|row| row[d]).collect();
        let m = mean(&column);
        let s = std_dev(&column);
        for row in rows.iter_mut() {
            row[d] = if s == 0.0 { 0.0 } else { (row[d] - m) / s };
        }
    }
    rows
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Total amount per calendar day, ordered by date
pub fn totals_by_day(transactions: &[Transaction]) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for tx in transactions {
        if tx.has_finite_amount() {
            *totals.entry(tx.date.date_naive()).or_insert(0.0) += tx.amount;
        }
    }
    totals
}

/// Total amount per category for one calendar month
pub fn month_category_spend(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> HashMap<String, f64> {
    let mut totals = HashMap::new();
    for tx in transactions {
        if tx.has_finite_amount() && tx.date.year() == year && tx.date.month() == month {
            *totals.entry(tx.category.clone()).or_insert(0.0) += tx.amount;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_datetime;

    fn txn(amount: f64, category: &str, date: &str) -> Transaction {
        Transaction {
            id: None,
            amount,
            category: category.to_string(),
            date: parse_datetime(date).unwrap(),
            merchant: None,
            description: None,
        }
    }

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(std_dev(&values), 2.0);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 100.0), 4.0);
        assert!((percentile(&values, 75.0) - 3.25).abs() < 1e-12);
        assert_eq!(percentile(&[5.0], 50.0), 5.0);
    }

    #[test]
    fn test_linear_slope() {
        assert!((linear_slope(&[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
        assert!(linear_slope(&[5.0, 5.0, 5.0]).abs() < 1e-12);
        assert_eq!(linear_slope(&[1.0]), 0.0);
    }

    #[test]
    fn test_z_normalize_centers_columns() {
        let rows = vec![vec![1.0, 7.0], vec![3.0, 7.0], vec![5.0, 7.0]];
        let normalized = z_normalize(rows);
        // first column is centered, constant second column collapses to zero
        let col: Vec<f64> = normalized.iter().map(|r| r[0]).collect();
        assert!(mean(&col).abs() < 1e-12);
        assert!((std_dev(&col) - 1.0).abs() < 1e-12);
        assert!(normalized.iter().all(|r| r[1] == 0.0));
    }

    #[test]
    fn test_totals_by_day_groups_and_skips_nan() {
        let mut txs = vec![
            txn(10.0, "food", "2024-03-01T08:00:00Z"),
            txn(5.0, "food", "2024-03-01T19:00:00Z"),
            txn(7.0, "gas", "2024-03-02"),
        ];
        txs.push(txn(f64::NAN, "food", "2024-03-02"));

        let totals = totals_by_day(&txs);
        assert_eq!(totals.len(), 2);
        let days: Vec<f64> = totals.values().copied().collect();
        assert_eq!(days, vec![15.0, 7.0]);
    }

    #[test]
    fn test_month_category_spend_matches_year() {
        let txs = vec![
            txn(10.0, "food", "2024-03-01"),
            txn(20.0, "food", "2024-03-15"),
            txn(99.0, "food", "2023-03-15"),
            txn(5.0, "gas", "2024-03-02"),
        ];
        let totals = month_category_spend(&txs, 2024, 3);
        assert_eq!(totals["food"], 30.0);
        assert_eq!(totals["gas"], 5.0);
        assert!(!totals.contains_key("rent"));
    }
}
