//! Composite financial health scoring
//!
//! Four sub-scores in [0,1] combined with fixed weights:
//!
//! - spending: consistency of transaction amounts (low variance scores high)
//! - savings: average progress across savings goals
//! - budget adherence: current-month spend against each category budget
//! - debt: share of transactions mentioning debt keywords
//!
//! Weak sub-scores produce factor and recommendation strings.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Budget, Goal, Transaction};
use crate::stats;

const SPENDING_WEIGHT: f64 = 0.30;
const SAVINGS_WEIGHT: f64 = 0.25;
const BUDGET_WEIGHT: f64 = 0.25;
const DEBT_WEIGHT: f64 = 0.20;

const DEBT_KEYWORDS: [&str; 4] = ["credit card", "loan", "interest", "payment"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    pub overall_score: f64,
    pub spending_score: f64,
    pub savings_score: f64,
    pub budget_adherence_score: f64,
    pub debt_score: f64,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub calculated_at: DateTime<Utc>,
}

impl HealthScore {
    /// Placeholder returned when scoring cannot run
    pub fn neutral() -> Self {
        Self {
            overall_score: 0.5,
            spending_score: 0.5,
            savings_score: 0.5,
            budget_adherence_score: 0.5,
            debt_score: 0.5,
            factors: vec!["Insufficient data for accurate scoring".to_string()],
            recommendations: vec!["Add more financial data to improve score accuracy".to_string()],
            calculated_at: Utc::now(),
        }
    }
}

pub struct HealthCalculator;

impl Default for HealthCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate_financial_health_score(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
        goals: &[Goal],
    ) -> HealthScore {
        self.score_at(transactions, budgets, goals, Utc::now())
    }

    fn score_at(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
        goals: &[Goal],
        now: DateTime<Utc>,
    ) -> HealthScore {
        let spending_score = spending_score(transactions);
        let savings_score = savings_score(goals);
        let budget_adherence_score = budget_adherence_score(transactions, budgets, now);
        let debt_score = debt_score(transactions);

        let overall_score = spending_score * SPENDING_WEIGHT
            + savings_score * SAVINGS_WEIGHT
            + budget_adherence_score * BUDGET_WEIGHT
            + debt_score * DEBT_WEIGHT;

        let factors = health_factors(spending_score, savings_score, budget_adherence_score, debt_score);
        let recommendations = health_recommendations(
            spending_score,
            savings_score,
            budget_adherence_score,
            debt_score,
        );

        tracing::debug!(
            overall = overall_score,
            spending = spending_score,
            savings = savings_score,
            budget = budget_adherence_score,
            debt = debt_score,
            "health score calculated"
        );

        HealthScore {
            overall_score,
            spending_score,
            savings_score,
            budget_adherence_score,
            debt_score,
            factors,
            recommendations,
            calculated_at: now,
        }
    }
}

/// Low amount variance relative to the mean scores high
fn spending_score(transactions: &[Transaction]) -> f64 {
    let amounts: Vec<f64> = transactions
        .iter()
        .filter(|tx| tx.has_finite_amount())
        .map(|tx| tx.amount)
        .collect();
    if amounts.is_empty() {
        return 0.5;
    }

    let mean = stats::mean(&amounts);
    if mean == 0.0 {
        return 0.5;
    }
    let variance = stats::variance(&amounts);
    stats::clamp01(1.0 - variance / (mean * mean))
}

/// Average goal progress, capped at 100% per goal
fn savings_score(goals: &[Goal]) -> f64 {
    if goals.is_empty() {
        // no savings goals at all
        return 0.3;
    }

    let total_progress: f64 = goals
        .iter()
        .map(|goal| {
            if goal.target_amount > 0.0 {
                (goal.current_amount / goal.target_amount).min(1.0)
            } else {
                0.0
            }
        })
        .sum();
    stats::clamp01(total_progress / goals.len() as f64)
}

/// Mean of per-budget current-month adherence ratios
fn budget_adherence_score(
    transactions: &[Transaction],
    budgets: &[Budget],
    now: DateTime<Utc>,
) -> f64 {
    if budgets.is_empty() {
        return 0.5;
    }

    let spending = stats::month_category_spend(transactions, now.year(), now.month());
    let scores: Vec<f64> = budgets
        .iter()
        .filter(|budget| budget.amount > 0.0)
        .map(|budget| {
            let actual = spending.get(&budget.category).copied().unwrap_or(0.0);
            if actual > 0.0 {
                (budget.amount / actual).min(1.0)
            } else {
                1.0
            }
        })
        .collect();

    if scores.is_empty() {
        0.5
    } else {
        stats::mean(&scores)
    }
}

/// Penalizes a high share of debt-related transactions
fn debt_score(transactions: &[Transaction]) -> f64 {
    if transactions.is_empty() {
        return 1.0;
    }

    let debt_count = transactions.iter().filter(|tx| mentions_debt(tx)).count();
    let debt_ratio = debt_count as f64 / transactions.len() as f64;
    (1.0 - debt_ratio * 2.0).max(0.0)
}

fn mentions_debt(tx: &Transaction) -> bool {
    match &tx.description {
        Some(description) => {
            let lowered = description.to_lowercase();
            DEBT_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
        }
        None => false,
    }
}

fn health_factors(spending: f64, savings: f64, budget: f64, debt: f64) -> Vec<String> {
    let mut factors = Vec::new();
    if spending < 0.5 {
        factors.push("Inconsistent spending patterns".to_string());
    }
    if savings < 0.5 {
        factors.push("Low savings rate or goal progress".to_string());
    }
    if budget < 0.5 {
        factors.push("Poor budget adherence".to_string());
    }
    if debt < 0.5 {
        factors.push("High debt burden".to_string());
    }

    if factors.is_empty() {
        factors.push("Good overall financial discipline".to_string());
    }
    factors
}

fn health_recommendations(spending: f64, savings: f64, budget: f64, debt: f64) -> Vec<String> {
    let mut recommendations = Vec::new();
    if spending < 0.6 {
        recommendations.push("Work on creating more consistent spending habits".to_string());
    }
    if savings < 0.6 {
        recommendations.push("Increase your savings rate and set clear financial goals".to_string());
    }
    if budget < 0.6 {
        recommendations.push("Improve budget tracking and adherence".to_string());
    }
    if debt < 0.6 {
        recommendations.push("Focus on debt reduction strategies".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Continue your excellent financial management".to_string());
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_datetime;

    fn txn(amount: f64, category: &str, date: &str, description: Option<&str>) -> Transaction {
        Transaction {
            id: None,
            amount,
            category: category.to_string(),
            date: parse_datetime(date).unwrap(),
            merchant: None,
            description: description.map(str::to_string),
        }
    }

    fn goal(target: f64, current: f64) -> Goal {
        Goal {
            name: "Emergency fund".to_string(),
            target_amount: target,
            current_amount: current,
            target_date: None,
        }
    }

    #[test]
    fn test_empty_inputs_never_panic_and_stay_in_range() {
        let score = HealthCalculator::new().calculate_financial_health_score(&[], &[], &[]);
        assert!(score.overall_score >= 0.0 && score.overall_score <= 1.0);
        assert_eq!(score.spending_score, 0.5);
        assert_eq!(score.savings_score, 0.3);
        assert_eq!(score.budget_adherence_score, 0.5);
        assert_eq!(score.debt_score, 1.0);
        // 0.5*0.3 + 0.3*0.25 + 0.5*0.25 + 1.0*0.2
        assert!((score.overall_score - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_overall_is_weighted_sum_of_subscores() {
        let txs = vec![
            txn(50.0, "food", "2024-03-01", None),
            txn(70.0, "food", "2024-03-02", Some("loan payment")),
        ];
        let score = HealthCalculator::new().calculate_financial_health_score(&txs, &[], &[]);
        let expected = score.spending_score * 0.30
            + score.savings_score * 0.25
            + score.budget_adherence_score * 0.25
            + score.debt_score * 0.20;
        assert!((score.overall_score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_constant_amounts_score_perfect_consistency() {
        let txs: Vec<Transaction> = (1..=10)
            .map(|day| txn(50.0, "food", &format!("2024-03-{:02}", day), None))
            .collect();
        assert_eq!(spending_score(&txs), 1.0);
    }

    #[test]
    fn test_erratic_amounts_score_low_consistency() {
        let txs = vec![
            txn(10.0, "food", "2024-03-01", None),
            txn(1000.0, "food", "2024-03-02", None),
            txn(10.0, "food", "2024-03-03", None),
            txn(1000.0, "food", "2024-03-04", None),
        ];
        assert!(spending_score(&txs) < 0.2);
    }

    #[test]
    fn test_goal_progress_drives_savings_score() {
        // 50% progress plus an over-achieved goal capped at 100%
        let goals = vec![goal(1000.0, 500.0), goal(100.0, 200.0)];
        assert!((savings_score(&goals) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_zero_target_goal_counts_as_no_progress() {
        let goals = vec![goal(0.0, 50.0), goal(100.0, 100.0)];
        assert!((savings_score(&goals) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_budget_adherence_uses_current_month_only() {
        let now = parse_datetime("2024-03-15T12:00:00Z").unwrap();
        let budgets = vec![Budget {
            category: "food".to_string(),
            amount: 100.0,
        }];
        let txs = vec![
            txn(200.0, "food", "2024-03-05", None),
            txn(900.0, "food", "2024-02-05", None), // previous month ignored
        ];
        let score = budget_adherence_score(&txs, &budgets, now);
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_untouched_budget_counts_as_full_adherence() {
        let now = parse_datetime("2024-03-15T12:00:00Z").unwrap();
        let budgets = vec![Budget {
            category: "travel".to_string(),
            amount: 300.0,
        }];
        let txs = vec![txn(50.0, "food", "2024-03-05", None)];
        assert_eq!(budget_adherence_score(&txs, &budgets, now), 1.0);
    }

    #[test]
    fn test_debt_keywords_lower_debt_score() {
        let txs = vec![
            txn(50.0, "food", "2024-03-01", Some("Groceries")),
            txn(200.0, "bills", "2024-03-02", Some("Credit Card payment")),
            txn(50.0, "food", "2024-03-03", None),
            txn(50.0, "food", "2024-03-04", Some("coffee")),
        ];
        // 1 of 4 transactions mentions debt
        assert!((debt_score(&txs) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_factor_strings_flag_weak_subscores() {
        let factors = health_factors(0.4, 0.6, 0.4, 0.9);
        assert_eq!(
            factors,
            vec!["Inconsistent spending patterns", "Poor budget adherence"]
        );
        assert_eq!(
            health_factors(0.9, 0.9, 0.9, 0.9),
            vec!["Good overall financial discipline"]
        );
    }

    #[test]
    fn test_recommendation_strings_use_looser_threshold() {
        let recommendations = health_recommendations(0.55, 0.9, 0.9, 0.9);
        assert_eq!(
            recommendations,
            vec!["Work on creating more consistent spending habits"]
        );
        assert_eq!(
            health_recommendations(0.9, 0.9, 0.9, 0.9),
            vec!["Continue your excellent financial management"]
        );
    }

    #[test]
    fn test_neutral_placeholder_shape() {
        let score = HealthScore::neutral();
        assert_eq!(score.overall_score, 0.5);
        assert_eq!(score.factors, vec!["Insufficient data for accurate scoring"]);
        assert_eq!(
            score.recommendations,
            vec!["Add more financial data to improve score accuracy"]
        );
    }
}
