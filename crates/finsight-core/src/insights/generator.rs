//! Builds the insight list from pattern, budget, goal and behavior analysis

use chrono::{DateTime, Datelike, Utc};

use crate::insights::types::{Insight, InsightType};
use crate::models::{Budget, Goal, Transaction};
use crate::patterns::{BehaviorClassifier, BehaviorType, SpendingPatternAnalyzer, TrendDirection};
use crate::stats;

// 10% over or 20% under a category budget is worth calling out
const OVER_BUDGET_RATIO: f64 = 1.1;
const UNDER_BUDGET_RATIO: f64 = 0.8;

const SUBSCRIPTION_KEYWORDS: [&str; 5] =
    ["netflix", "spotify", "subscription", "monthly", "annual"];
const SUBSCRIPTION_MIN_MATCHES: usize = 5;
const SUBSCRIPTION_RECENT_WINDOW: usize = 30;

pub struct InsightGenerator {
    analyzer: SpendingPatternAnalyzer,
    classifier: BehaviorClassifier,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator {
    pub fn new() -> Self {
        Self {
            analyzer: SpendingPatternAnalyzer::new(),
            classifier: BehaviorClassifier::new(),
        }
    }

    /// Run every insight pass that has the data it needs
    pub fn generate_insights(
        &self,
        user_id: i64,
        transactions: &[Transaction],
        budgets: &[Budget],
        goals: &[Goal],
    ) -> Vec<Insight> {
        self.generate_at(user_id, transactions, budgets, goals, Utc::now())
    }

    fn generate_at(
        &self,
        user_id: i64,
        transactions: &[Transaction],
        budgets: &[Budget],
        goals: &[Goal],
        now: DateTime<Utc>,
    ) -> Vec<Insight> {
        let mut insights = Vec::new();

        if !transactions.is_empty() {
            insights.extend(self.pattern_insights(user_id, transactions));
        }
        if !budgets.is_empty() && !transactions.is_empty() {
            insights.extend(self.budget_insights(user_id, budgets, transactions, now));
        }
        if !goals.is_empty() {
            insights.extend(self.goal_insights(user_id, goals, now));
        }
        insights.extend(self.savings_insights(user_id, transactions));

        tracing::debug!(user_id, count = insights.len(), "insight generation complete");
        insights
    }

    fn pattern_insights(&self, user_id: i64, transactions: &[Transaction]) -> Vec<Insight> {
        let report = self.analyzer.analyze_spending_patterns(transactions);
        let patterns = &report.patterns;
        let mut insights = Vec::new();

        // highest-spend category, first alphabetically on ties
        let top = patterns
            .category_patterns
            .top_categories
            .iter()
            .fold(None::<(&String, f64)>, |best, (category, &total)| {
                match best {
                    Some((_, best_total)) if total <= best_total => best,
                    _ => Some((category, total)),
                }
            });
        if let Some((category, total)) = top {
            insights.push(
                Insight::new(
                    user_id,
                    InsightType::SpendingPattern,
                    format!("Your highest spending is in {}", category),
                    format!(
                        "You've spent ${:.2} in {} recently, which represents your largest expense category.",
                        total, category
                    ),
                    0.9,
                )
                .with_actions(vec![
                    format!("Review your {} expenses for optimization opportunities", category),
                    format!("Set a monthly budget limit for {}", category),
                    format!("Look for ways to reduce {} costs", category),
                ]),
            );
        }

        let increasing: Vec<&str> = patterns
            .category_patterns
            .category_trends
            .iter()
            .filter(|(_, trend)| **trend == TrendDirection::Increasing)
            .map(|(category, _)| category.as_str())
            .collect();
        if !increasing.is_empty() {
            let listed = increasing
                .iter()
                .take(3)
                .copied()
                .collect::<Vec<_>>()
                .join(", ");
            insights.push(
                Insight::new(
                    user_id,
                    InsightType::SpendingPattern,
                    "Rising spending detected in multiple categories",
                    format!(
                        "Your spending is increasing in: {}. This trend may impact your budget.",
                        listed
                    ),
                    0.8,
                )
                .with_actions(vec![
                    "Review recent purchases in these categories".to_string(),
                    "Consider setting spending alerts".to_string(),
                    "Evaluate if this increase is temporary or permanent".to_string(),
                ]),
            );
        }

        if let Some(peak_day) = &patterns.temporal_patterns.peak_spending_day {
            insights.push(
                Insight::new(
                    user_id,
                    InsightType::SpendingPattern,
                    format!("You spend the most on {}s", peak_day),
                    format!(
                        "{} is your highest spending day of the week. Consider planning purchases to spread costs more evenly.",
                        peak_day
                    ),
                    0.7,
                )
                .with_actions(vec![
                    format!("Plan {} expenses in advance", peak_day),
                    "Consider moving some purchases to other days".to_string(),
                    "Set a daily spending limit for high-spend days".to_string(),
                ]),
            );
        }

        insights
    }

    fn budget_insights(
        &self,
        user_id: i64,
        budgets: &[Budget],
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Vec<Insight> {
        let spending = stats::month_category_spend(transactions, now.year(), now.month());

        let mut overages = Vec::new();
        let mut savings = Vec::new();
        for budget in budgets {
            let actual = spending.get(&budget.category).copied().unwrap_or(0.0);
            if actual > budget.amount * OVER_BUDGET_RATIO {
                overages.push(actual - budget.amount);
            } else if actual < budget.amount * UNDER_BUDGET_RATIO {
                savings.push(budget.amount - actual);
            }
        }

        let mut insights = Vec::new();
        if !overages.is_empty() {
            let total_overage: f64 = overages.iter().sum();
            insights.push(
                Insight::new(
                    user_id,
                    InsightType::BudgetAlert,
                    format!("Over budget in {} categories", overages.len()),
                    format!(
                        "You're ${:.2} over budget this month across multiple categories.",
                        total_overage
                    ),
                    0.95,
                )
                .with_actions(vec![
                    "Review overspending categories immediately".to_string(),
                    "Adjust remaining month spending to compensate".to_string(),
                    "Consider increasing budgets for consistently overspent categories".to_string(),
                ]),
            );
        }
        if !savings.is_empty() {
            let total_savings: f64 = savings.iter().sum();
            insights.push(
                Insight::new(
                    user_id,
                    InsightType::SavingOpportunity,
                    "Great job staying under budget!",
                    format!(
                        "You're ${:.2} under budget in {} categories this month.",
                        total_savings,
                        savings.len()
                    ),
                    0.9,
                )
                .with_actions(vec![
                    "Consider moving excess budget to savings".to_string(),
                    "Reallocate funds to over-budget categories".to_string(),
                    "Reward yourself for good budget discipline".to_string(),
                ]),
            );
        }

        insights
    }

    fn goal_insights(&self, user_id: i64, goals: &[Goal], now: DateTime<Utc>) -> Vec<Insight> {
        let mut insights = Vec::new();
        for goal in goals {
            if goal.target_amount <= 0.0 {
                continue;
            }
            let progress = goal.current_amount / goal.target_amount * 100.0;

            // only goals with a future deadline get a nudge
            let target_date = match goal.target_date {
                Some(date) => date,
                None => continue,
            };
            let days_remaining = (target_date - now).num_days();
            if days_remaining <= 0 {
                continue;
            }
            let daily_needed = (goal.target_amount - goal.current_amount) / days_remaining as f64;

            if progress < 50.0 && days_remaining < 90 {
                insights.push(
                    Insight::new(
                        user_id,
                        InsightType::GoalProgress,
                        format!("{} needs attention", goal.name),
                        format!(
                            "You're {:.1}% towards your goal with {} days left. You need to save ${:.2} daily to reach it.",
                            progress, days_remaining, daily_needed
                        ),
                        0.85,
                    )
                    .with_actions(vec![
                        format!("Increase daily savings to ${:.2}", daily_needed),
                        "Review and cut unnecessary expenses".to_string(),
                        "Consider extending the goal timeline if needed".to_string(),
                    ]),
                );
            } else if progress > 80.0 {
                insights.push(
                    Insight::new(
                        user_id,
                        InsightType::GoalProgress,
                        format!("Almost there with {}!", goal.name),
                        format!(
                            "You're {:.1}% towards your goal. Keep up the great work!",
                            progress
                        ),
                        0.9,
                    )
                    .with_actions(vec![
                        "Maintain current savings rate".to_string(),
                        "Start planning your next financial goal".to_string(),
                        "Celebrate your progress so far".to_string(),
                    ]),
                );
            }
        }
        insights
    }

    fn savings_insights(&self, user_id: i64, transactions: &[Transaction]) -> Vec<Insight> {
        if transactions.is_empty() {
            return Vec::new();
        }
        let mut insights = Vec::new();

        let behavior = self.classifier.classify_spending_behavior(transactions, None);
        if behavior.behavior_type == BehaviorType::ImpulseSpender {
            insights.push(
                Insight::new(
                    user_id,
                    InsightType::SavingOpportunity,
                    "Reduce impulse spending to save more",
                    "Your spending pattern shows frequent impulse purchases. Implementing a waiting period could help you save significantly.",
                    0.8,
                )
                .with_actions(vec![
                    "Use the 24-hour rule for purchases over $50".to_string(),
                    "Remove saved payment methods from shopping apps".to_string(),
                    "Create a wish list instead of buying immediately".to_string(),
                ]),
            );
        }

        let subscriptions: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| mentions_subscription(tx))
            .collect();
        if subscriptions.len() > SUBSCRIPTION_MIN_MATCHES {
            let start = subscriptions.len().saturating_sub(SUBSCRIPTION_RECENT_WINDOW);
            let total: f64 = subscriptions[start..]
                .iter()
                .filter(|tx| tx.has_finite_amount())
                .map(|tx| tx.amount)
                .sum();
            insights.push(
                Insight::new(
                    user_id,
                    InsightType::SavingOpportunity,
                    "Review your subscriptions",
                    format!(
                        "You have multiple subscription services costing approximately ${:.2} recently. Review and cancel unused ones.",
                        total
                    ),
                    0.75,
                )
                .with_actions(vec![
                    "List all your active subscriptions".to_string(),
                    "Cancel subscriptions you don't use regularly".to_string(),
                    "Look for cheaper alternatives to expensive services".to_string(),
                ]),
            );
        }

        insights
    }
}

fn mentions_subscription(tx: &Transaction) -> bool {
    match &tx.description {
        Some(description) => {
            let lowered = description.to_lowercase();
            SUBSCRIPTION_KEYWORDS
                .iter()
                .any(|keyword| lowered.contains(keyword))
        }
        None => false,
    }
}
