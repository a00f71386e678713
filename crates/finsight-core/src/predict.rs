//! Spending, cash-flow and budget forecasting
//!
//! Three predictors, all total functions that fall back to neutral output
//! instead of erroring:
//!
//! - `SpendingPredictor` picks a model by history depth: under 7 distinct
//!   days a rough per-transaction average, under 30 a daily-average
//!   extrapolation, otherwise a least-squares fit over calendar features
//! - `CashFlowPredictor` projects the historical monthly income/expense
//!   averages forward unchanged
//! - `BudgetPredictor` scales the current calendar month's spend per
//!   category and flags categories on track to overshoot their budget

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Budget, Transaction};
use crate::regression::{fit_ols, predict_ols};
use crate::stats;

const MIN_HISTORY_DAYS: usize = 7;
const ADVANCED_MIN_DAYS: usize = 30;
const DAYS_PER_MONTH: f64 = 30.0;
const AT_RISK_RATIO: f64 = 1.1;

/// Forecast of future spending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub total_predicted: f64,
    pub monthly_breakdown: Vec<f64>,
    pub category_predictions: BTreeMap<String, f64>,
    pub trend: f64,
    pub confidence_score: f64,
}

impl PredictionResult {
    /// Zero forecast used when there is no usable history
    pub fn empty(months: u32) -> Self {
        Self {
            total_predicted: 0.0,
            monthly_breakdown: vec![0.0; months as usize],
            category_predictions: BTreeMap::new(),
            trend: 0.0,
            confidence_score: 0.3,
        }
    }
}

/// Predicts total and per-category spending for the next N months
pub struct SpendingPredictor;

impl Default for SpendingPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl SpendingPredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict_spending(&self, transactions: &[Transaction], months: u32) -> PredictionResult {
        let daily = stats::totals_by_day(transactions);
        if daily.len() < MIN_HISTORY_DAYS {
            return self.fallback_prediction(transactions, months);
        }

        if daily.len() >= ADVANCED_MIN_DAYS {
            match self.advanced_prediction(transactions, &daily, months) {
                Ok(result) => return result,
                Err(e) => {
                    tracing::warn!(error = %e, "advanced spending model failed, using simple average");
                }
            }
        }
        self.simple_prediction(transactions, &daily, months)
    }

    /// Least-squares fit of daily totals against calendar features
    fn advanced_prediction(
        &self,
        transactions: &[Transaction],
        daily: &BTreeMap<NaiveDate, f64>,
        months: u32,
    ) -> Result<PredictionResult> {
        let (first, last) = match (daily.keys().next(), daily.keys().next_back()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(Error::InsufficientData("no daily history".to_string())),
        };

        let xs: Vec<Vec<f64>> = daily.keys().map(|day| feature_row(*day, first)).collect();
        let ys: Vec<f64> = daily.values().copied().collect();
        let coefficients = fit_ols(&xs, &ys)?;

        // predict 30 days per future month, clamping each day at zero
        let forecast_start = last + Duration::days(1);
        let mut monthly_breakdown = Vec::with_capacity(months as usize);
        for month in 0..months {
            let month_start = forecast_start + Duration::days(i64::from(month) * 30);
            let mut month_total = 0.0;
            for day in 0..30 {
                let date = month_start + Duration::days(day);
                month_total += predict_ols(&coefficients, &feature_row(date, first)).max(0.0);
            }
            monthly_breakdown.push(month_total);
        }

        let daily_sums: Vec<f64> = daily.values().copied().collect();
        let older: Vec<f64> = daily_sums.iter().take(7).copied().collect();
        let recent: Vec<f64> = daily_sums[daily_sums.len() - 7..].to_vec();
        let older_avg = stats::mean(&older);
        let trend = if older_avg > 0.0 {
            (stats::mean(&recent) - older_avg) / older_avg
        } else {
            0.0
        };

        Ok(PredictionResult {
            total_predicted: monthly_breakdown.iter().sum(),
            monthly_breakdown,
            category_predictions: category_projection(transactions, daily.len(), months),
            trend,
            confidence_score: (daily.len() as f64 / 60.0).min(0.9),
        })
    }

    /// Flat daily-average extrapolation
    fn simple_prediction(
        &self,
        transactions: &[Transaction],
        daily: &BTreeMap<NaiveDate, f64>,
        months: u32,
    ) -> PredictionResult {
        let daily_sums: Vec<f64> = daily.values().copied().collect();
        let monthly = stats::mean(&daily_sums) * DAYS_PER_MONTH;
        let monthly_breakdown = vec![monthly; months as usize];

        PredictionResult {
            total_predicted: monthly_breakdown.iter().sum(),
            monthly_breakdown,
            category_predictions: category_projection(transactions, daily.len(), months),
            trend: 0.0,
            confidence_score: 0.6,
        }
    }

    /// Rough per-transaction average for very thin histories
    fn fallback_prediction(&self, transactions: &[Transaction], months: u32) -> PredictionResult {
        if transactions.is_empty() {
            return PredictionResult::empty(months);
        }

        let total: f64 = transactions
            .iter()
            .filter(|tx| tx.has_finite_amount())
            .map(|tx| tx.amount)
            .sum();
        let divisor = (transactions.len() as f64 / DAYS_PER_MONTH).max(1.0);
        let avg_monthly = total / divisor;

        PredictionResult {
            total_predicted: avg_monthly * f64::from(months),
            monthly_breakdown: vec![avg_monthly; months as usize],
            category_predictions: BTreeMap::new(),
            trend: 0.0,
            confidence_score: 0.5,
        }
    }
}

fn feature_row(date: NaiveDate, start: NaiveDate) -> Vec<f64> {
    vec![
        date.weekday().num_days_from_monday() as f64,
        date.day() as f64,
        date.month() as f64,
        (date - start).num_days() as f64,
    ]
}

/// Historical per-category daily rate scaled out to the forecast horizon
fn category_projection(
    transactions: &[Transaction],
    distinct_days: usize,
    months: u32,
) -> BTreeMap<String, f64> {
    if distinct_days == 0 {
        return BTreeMap::new();
    }
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.has_finite_amount()) {
        *totals.entry(tx.category.clone()).or_insert(0.0) += tx.amount;
    }
    let scale = DAYS_PER_MONTH * f64::from(months) / distinct_days as f64;
    totals
        .into_iter()
        .map(|(category, total)| (category, total * scale))
        .collect()
}

/// One projected month of cash flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthProjection {
    pub month: u32,
    pub projected_income: f64,
    pub projected_expenses: f64,
    pub net_cash_flow: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowResult {
    pub monthly_projections: Vec<MonthProjection>,
    pub total_projected_income: f64,
    pub total_projected_expenses: f64,
    pub net_cash_flow: f64,
}

/// Projects the historical monthly income/expense averages forward
pub struct CashFlowPredictor;

impl Default for CashFlowPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl CashFlowPredictor {
    pub fn new() -> Self {
        Self
    }

    /// Positive amounts count as income, negative as expenses
    pub fn predict_cash_flow(&self, transactions: &[Transaction], months: u32) -> CashFlowResult {
        let monthly_income = monthly_average(transactions, |amount| amount > 0.0);
        let monthly_expenses = monthly_average(transactions, |amount| amount < 0.0).abs();
        let net = monthly_income - monthly_expenses;

        let monthly_projections = (0..months)
            .map(|month| MonthProjection {
                month,
                projected_income: monthly_income,
                projected_expenses: monthly_expenses,
                net_cash_flow: net,
            })
            .collect();

        CashFlowResult {
            monthly_projections,
            total_projected_income: monthly_income * f64::from(months),
            total_projected_expenses: monthly_expenses * f64::from(months),
            net_cash_flow: net * f64::from(months),
        }
    }
}

/// Mean of calendar-month totals over the transactions `keep` selects
fn monthly_average(transactions: &[Transaction], keep: impl Fn(f64) -> bool) -> f64 {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for tx in transactions {
        if tx.has_finite_amount() && keep(tx.amount) {
            *buckets
                .entry((tx.date.year(), tx.date.month()))
                .or_insert(0.0) += tx.amount;
        }
    }
    let totals: Vec<f64> = buckets.values().copied().collect();
    stats::mean(&totals)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryForecast {
    pub category: String,
    pub budgeted: f64,
    pub predicted: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtRiskCategory {
    pub name: String,
    pub predicted_overage: f64,
    pub risk_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetForecast {
    pub category_forecasts: Vec<CategoryForecast>,
    pub at_risk_categories: Vec<AtRiskCategory>,
    pub recommendations: Vec<String>,
    pub overall_adherence_score: f64,
}

/// Flags budget categories on track to overshoot
pub struct BudgetPredictor;

impl Default for BudgetPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetPredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn forecast_budget_performance(
        &self,
        budgets: &[Budget],
        transactions: &[Transaction],
        months: u32,
    ) -> BudgetForecast {
        self.forecast_at(budgets, transactions, months, Utc::now())
    }

    fn forecast_at(
        &self,
        budgets: &[Budget],
        transactions: &[Transaction],
        months: u32,
        now: DateTime<Utc>,
    ) -> BudgetForecast {
        if budgets.is_empty() || transactions.is_empty() {
            return default_forecast();
        }

        let current = stats::month_category_spend(transactions, now.year(), now.month());
        let horizon = f64::from(months);

        let mut category_forecasts = Vec::with_capacity(budgets.len());
        let mut at_risk_categories = Vec::new();
        for budget in budgets {
            let budgeted = budget.amount * horizon;
            let actual = current.get(&budget.category).copied().unwrap_or(0.0);
            let predicted = actual * horizon;
            category_forecasts.push(CategoryForecast {
                category: budget.category.clone(),
                budgeted,
                predicted,
            });

            // ratio form keeps the 10% margin exact at the boundary
            if budgeted > 0.0 && predicted / budgeted >= AT_RISK_RATIO {
                at_risk_categories.push(AtRiskCategory {
                    name: budget.category.clone(),
                    predicted_overage: predicted - budgeted,
                    risk_percentage: (predicted - budgeted) / budgeted * 100.0,
                });
            }
        }

        let total_budgeted: f64 = category_forecasts.iter().map(|f| f.budgeted).sum();
        let total_predicted: f64 = category_forecasts.iter().map(|f| f.predicted).sum();
        let overall_adherence_score = if total_predicted > 0.0 {
            (total_budgeted / total_predicted).min(1.0)
        } else {
            1.0
        };

        let recommendations =
            budget_recommendations(at_risk_categories.len(), overall_adherence_score);
        tracing::debug!(
            categories = category_forecasts.len(),
            at_risk = at_risk_categories.len(),
            "budget forecast complete"
        );

        BudgetForecast {
            category_forecasts,
            at_risk_categories,
            recommendations,
            overall_adherence_score,
        }
    }
}

fn default_forecast() -> BudgetForecast {
    BudgetForecast {
        category_forecasts: Vec::new(),
        at_risk_categories: Vec::new(),
        recommendations: vec!["Add budget and transaction data to get accurate forecasts".to_string()],
        overall_adherence_score: 0.5,
    }
}

fn budget_recommendations(at_risk_count: usize, adherence_score: f64) -> Vec<String> {
    let mut recommendations = Vec::new();
    if at_risk_count > 0 {
        recommendations.push(format!(
            "Monitor spending in {} at-risk categories",
            at_risk_count
        ));
        recommendations
            .push("Consider adjusting budgets for consistently overspent categories".to_string());
    }

    if adherence_score < 0.8 {
        recommendations.push("Overall budget adherence needs improvement".to_string());
        recommendations.push("Review and optimize your spending habits".to_string());
    } else if adherence_score > 0.95 {
        recommendations.push("Excellent budget discipline!".to_string());
        recommendations.push("Consider increasing savings or investment allocations".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Your budget forecast looks healthy".to_string());
    }
    recommendations
}
