//! Ordinary least squares on small feature sets
//!
//! Solves the normal equations with Gaussian elimination and partial
//! pivoting. An intercept column is added internally, so callers pass raw
//! feature rows and get back `[intercept, b1, b2, ...]`.

use crate::error::{Error, Result};

/// Fit coefficients for `y = intercept + b1*x1 + ... + bk*xk`
pub fn fit_ols(xs: &[Vec<f64>], ys: &[f64]) -> Result<Vec<f64>> {
    if xs.is_empty() || xs.len() != ys.len() {
        return Err(Error::InvalidData(
            "regression needs matching, non-empty feature and target rows".to_string(),
        ));
    }
    let dims = xs[0].len();
    if xs.iter().any(|row| row.len() != dims) {
        return Err(Error::InvalidData(
            "feature rows must share a dimension".to_string(),
        ));
    }

    let n_coef = dims + 1;
    let mut xtx = vec![vec![0.0; n_coef]; n_coef];
    let mut xty = vec![0.0; n_coef];
    for (row, &y) in xs.iter().zip(ys) {
        for i in 0..n_coef {
            let xi = if i == 0 { 1.0 } else { row[i - 1] };
            xty[i] += xi * y;
            for j in 0..n_coef {
                let xj = if j == 0 { 1.0 } else { row[j - 1] };
                xtx[i][j] += xi * xj;
            }
        }
    }

    solve(xtx, xty)
}

/// Evaluate a fitted model at one feature row
pub fn predict_ols(coefficients: &[f64], features: &[f64]) -> f64 {
    coefficients[0]
        + coefficients[1..]
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum::<f64>()
}

fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < 1e-10 {
            return Err(Error::Computation(
                "design matrix is singular".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in row + 1..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_exact_line() {
        let xs: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64]).collect();
        let ys: Vec<f64> = (0..6).map(|i| 2.0 + 3.0 * i as f64).collect();

        let coef = fit_ols(&xs, &ys).unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] - 3.0).abs() < 1e-9);
        assert!((predict_ols(&coef, &[10.0]) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_recovers_two_features() {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for a in 0..4 {
            for b in 0..4 {
                xs.push(vec![a as f64, b as f64]);
                ys.push(1.0 + 2.0 * a as f64 + 0.5 * b as f64);
            }
        }

        let coef = fit_ols(&xs, &ys).unwrap();
        assert!((coef[0] - 1.0).abs() < 1e-9);
        assert!((coef[1] - 2.0).abs() < 1e-9);
        assert!((coef[2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_features_error() {
        let xs = vec![vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0]];
        let ys = vec![1.0, 2.0, 3.0];
        assert!(matches!(fit_ols(&xs, &ys), Err(Error::Computation(_))));
    }

    #[test]
    fn test_mismatched_rows_error() {
        assert!(fit_ols(&[], &[]).is_err());
        assert!(fit_ols(&[vec![1.0]], &[1.0, 2.0]).is_err());
    }
}
