//! Spending pattern analysis and behavior classification
//!
//! `SpendingPatternAnalyzer` produces a structured report with five
//! sub-analyses (category, temporal, amount, merchant, behavioral clusters)
//! plus a short list of plain-language insights. `BehaviorClassifier` boils
//! a transaction history down to one of five behavior types with matching
//! recommendations.
//!
//! All groupings use ordered maps so repeated runs over the same input
//! produce identical reports.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::cluster::kmeans;
use crate::error::Error;
use crate::models::{Budget, Transaction};
use crate::stats;

const CLUSTER_SEED: u64 = 42;
const MIN_CLUSTER_DAYS: usize = 5;
const MAX_CLUSTERS: usize = 3;

/// Direction of a category's month-over-month spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total_spent: f64,
    pub avg_amount: f64,
    pub transaction_count: usize,
    pub amount_std: f64,
    pub first_transaction: DateTime<Utc>,
    pub last_transaction: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatterns {
    pub category_statistics: BTreeMap<String, CategoryStats>,
    pub category_trends: BTreeMap<String, TrendDirection>,
    pub top_categories: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOfWeekStats {
    pub sum: f64,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourStats {
    pub sum: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemporalPatterns {
    pub day_of_week_patterns: BTreeMap<String, DayOfWeekStats>,
    pub monthly_seasonality: BTreeMap<u32, f64>,
    pub hourly_patterns: BTreeMap<u32, HourStats>,
    pub weekly_trends: BTreeMap<u32, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_spending_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_spending_hour: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmountStatistics {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierStats {
    pub count: usize,
    pub total: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpendingTiers {
    pub small: TierStats,
    pub medium: TierStats,
    pub large: TierStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmountPatterns {
    pub amount_statistics: AmountStatistics,
    pub spending_tiers: SpendingTiers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantStats {
    pub total_spent: f64,
    pub avg_amount: f64,
    pub visit_count: usize,
    pub first_visit: DateTime<Utc>,
    pub last_visit: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_frequency: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerchantPatterns {
    pub top_merchants: BTreeMap<String, MerchantStats>,
    pub frequent_merchants: BTreeMap<String, MerchantStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub size: usize,
    pub avg_daily_spending: f64,
    pub avg_transactions_per_day: f64,
    pub avg_transaction_amount: f64,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehavioralClusters {
    pub clusters: BTreeMap<String, ClusterSummary>,
    pub total_clusters: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSections {
    pub category_patterns: CategoryPatterns,
    pub temporal_patterns: TemporalPatterns,
    pub amount_patterns: AmountPatterns,
    pub merchant_patterns: MerchantPatterns,
    pub behavioral_clusters: BehavioralClusters,
}

/// Full output of one pattern analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternReport {
    pub patterns: PatternSections,
    pub insights: Vec<String>,
    pub analysis_date: DateTime<Utc>,
}

/// Builds the five-section spending report
pub struct SpendingPatternAnalyzer;

impl Default for SpendingPatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpendingPatternAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a transaction history; empty input yields an empty report
    pub fn analyze_spending_patterns(&self, transactions: &[Transaction]) -> PatternReport {
        if transactions.is_empty() {
            return PatternReport {
                patterns: PatternSections::default(),
                insights: Vec::new(),
                analysis_date: Utc::now(),
            };
        }

        let txs: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.has_finite_amount())
            .collect();
        let patterns = PatternSections {
            category_patterns: self.category_patterns(&txs),
            temporal_patterns: self.temporal_patterns(&txs),
            amount_patterns: self.amount_patterns(&txs),
            merchant_patterns: self.merchant_patterns(&txs),
            behavioral_clusters: self.behavioral_clusters(&txs),
        };
        let insights = self.pattern_insights(&patterns);

        tracing::debug!(
            transactions = transactions.len(),
            insights = insights.len(),
            "spending pattern analysis complete"
        );
        PatternReport {
            patterns,
            insights,
            analysis_date: Utc::now(),
        }
    }

    fn category_patterns(&self, txs: &[&Transaction]) -> CategoryPatterns {
        let mut by_category: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for &tx in txs {
            by_category.entry(tx.category.as_str()).or_default().push(tx);
        }

        let mut category_statistics = BTreeMap::new();
        let mut totals: Vec<(String, f64)> = Vec::new();
        for (category, members) in &by_category {
            let amounts: Vec<f64> = members.iter().map(|tx| tx.amount).collect();
            let total: f64 = amounts.iter().sum();
            let first = members.iter().map(|tx| tx.date).min();
            let last = members.iter().map(|tx| tx.date).max();
            if let (Some(first), Some(last)) = (first, last) {
                category_statistics.insert(
                    category.to_string(),
                    CategoryStats {
                        total_spent: stats::round2(total),
                        avg_amount: stats::round2(stats::mean(&amounts)),
                        transaction_count: members.len(),
                        amount_std: stats::round2(stats::std_dev(&amounts)),
                        first_transaction: first,
                        last_transaction: last,
                    },
                );
            }
            totals.push((category.to_string(), total));
        }
        totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        let top_categories: BTreeMap<String, f64> = totals
            .iter()
            .take(5)
            .map(|(category, total)| (category.clone(), *total))
            .collect();

        // month-over-month slope per category, needs at least two months
        let months: BTreeSet<(i32, u32)> = txs
            .iter()
            .map(|tx| (tx.date.year(), tx.date.month()))
            .collect();
        let mut category_trends = BTreeMap::new();
        if months.len() > 1 {
            for (category, members) in &by_category {
                let series: Vec<f64> = months
                    .iter()
                    .map(|&(year, month)| {
                        members
                            .iter()
                            .filter(|tx| tx.date.year() == year && tx.date.month() == month)
                            .map(|tx| tx.amount)
                            .sum()
                    })
                    .collect();
                let slope = stats::linear_slope(&series);
                let direction = if slope > 0.0 {
                    TrendDirection::Increasing
                } else if slope < 0.0 {
                    TrendDirection::Decreasing
                } else {
                    TrendDirection::Stable
                };
                category_trends.insert(category.to_string(), direction);
            }
        }

        CategoryPatterns {
            category_statistics,
            category_trends,
            top_categories,
        }
    }

    fn temporal_patterns(&self, txs: &[&Transaction]) -> TemporalPatterns {
        let mut by_day: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();
        let mut by_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        let mut monthly_seasonality: BTreeMap<u32, f64> = BTreeMap::new();
        let mut weekly_trends: BTreeMap<u32, f64> = BTreeMap::new();
        for &tx in txs {
            by_day
                .entry(weekday_name(tx.date.weekday()))
                .or_default()
                .push(tx.amount);
            by_hour.entry(tx.date.hour()).or_default().push(tx.amount);
            *monthly_seasonality.entry(tx.date.month()).or_insert(0.0) += tx.amount;
            *weekly_trends
                .entry(tx.date.iso_week().week())
                .or_insert(0.0) += tx.amount;
        }

        let day_of_week_patterns: BTreeMap<String, DayOfWeekStats> = by_day
            .into_iter()
            .map(|(day, amounts)| {
                (
                    day.to_string(),
                    DayOfWeekStats {
                        sum: stats::round2(amounts.iter().sum()),
                        mean: stats::round2(stats::mean(&amounts)),
                        count: amounts.len(),
                    },
                )
            })
            .collect();
        let hourly_patterns: BTreeMap<u32, HourStats> = by_hour
            .into_iter()
            .map(|(hour, amounts)| {
                (
                    hour,
                    HourStats {
                        sum: stats::round2(amounts.iter().sum()),
                        count: amounts.len(),
                    },
                )
            })
            .collect();

        // first maximum wins on ties
        let mut peak_spending_day = None;
        let mut best = f64::NEG_INFINITY;
        for (day, day_stats) in &day_of_week_patterns {
            if day_stats.sum > best {
                best = day_stats.sum;
                peak_spending_day = Some(day.clone());
            }
        }
        let mut peak_spending_hour = None;
        let mut best = f64::NEG_INFINITY;
        for (hour, hour_stats) in &hourly_patterns {
            if hour_stats.sum > best {
                best = hour_stats.sum;
                peak_spending_hour = Some(*hour);
            }
        }

        TemporalPatterns {
            day_of_week_patterns,
            monthly_seasonality,
            hourly_patterns,
            weekly_trends,
            peak_spending_day,
            peak_spending_hour,
        }
    }

    fn amount_patterns(&self, txs: &[&Transaction]) -> AmountPatterns {
        let amounts: Vec<f64> = txs.iter().map(|tx| tx.amount).collect();
        if amounts.is_empty() {
            return AmountPatterns::default();
        }

        let q25 = stats::percentile(&amounts, 25.0);
        let q75 = stats::percentile(&amounts, 75.0);
        let amount_statistics = AmountStatistics {
            mean: stats::mean(&amounts),
            median: stats::median(&amounts),
            std: stats::std_dev(&amounts),
            min: amounts.iter().copied().fold(f64::INFINITY, f64::min),
            max: amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            q25,
            q75,
        };

        let small: Vec<f64> = amounts.iter().copied().filter(|&a| a < q25).collect();
        let medium: Vec<f64> = amounts
            .iter()
            .copied()
            .filter(|&a| a >= q25 && a <= q75)
            .collect();
        let large: Vec<f64> = amounts.iter().copied().filter(|&a| a > q75).collect();

        AmountPatterns {
            amount_statistics,
            spending_tiers: SpendingTiers {
                small: tier(&small),
                medium: tier(&medium),
                large: tier(&large),
            },
        }
    }

    fn merchant_patterns(&self, txs: &[&Transaction]) -> MerchantPatterns {
        let mut by_merchant: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for &tx in txs {
            if let Some(merchant) = tx.merchant.as_deref() {
                by_merchant.entry(merchant).or_default().push(tx);
            }
        }
        if by_merchant.is_empty() {
            return MerchantPatterns {
                note: Some("No merchant data available".to_string()),
                ..Default::default()
            };
        }

        let mut rows: Vec<(String, MerchantStats)> = Vec::new();
        for (merchant, members) in &by_merchant {
            let amounts: Vec<f64> = members.iter().map(|tx| tx.amount).collect();
            let first = members.iter().map(|tx| tx.date).min();
            let last = members.iter().map(|tx| tx.date).max();
            if let (Some(first), Some(last)) = (first, last) {
                let range_days = (last - first).num_days();
                rows.push((
                    merchant.to_string(),
                    MerchantStats {
                        total_spent: stats::round2(amounts.iter().sum()),
                        avg_amount: stats::round2(stats::mean(&amounts)),
                        visit_count: members.len(),
                        first_visit: first,
                        last_visit: last,
                        visit_frequency: (range_days > 0)
                            .then(|| members.len() as f64 / range_days as f64),
                    },
                ));
            }
        }

        let mut by_spend = rows.clone();
        by_spend.sort_by(|a, b| b.1.total_spent.partial_cmp(&a.1.total_spent).unwrap());
        let top_merchants: BTreeMap<String, MerchantStats> =
            by_spend.into_iter().take(10).collect();

        let mut by_visits = rows;
        by_visits.sort_by(|a, b| b.1.visit_count.cmp(&a.1.visit_count));
        let frequent_merchants: BTreeMap<String, MerchantStats> =
            by_visits.into_iter().take(10).collect();

        MerchantPatterns {
            top_merchants,
            frequent_merchants,
            note: None,
        }
    }

    fn behavioral_clusters(&self, txs: &[&Transaction]) -> BehavioralClusters {
        let mut daily: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for &tx in txs {
            let entry = daily.entry(tx.date.date_naive()).or_insert((0.0, 0));
            entry.0 += tx.amount;
            entry.1 += 1;
        }
        if daily.len() < MIN_CLUSTER_DAYS {
            return BehavioralClusters {
                note: Some("Insufficient data for clustering".to_string()),
                ..Default::default()
            };
        }

        // per-day features: total, transaction count, mean amount
        let raw: Vec<Vec<f64>> = daily
            .values()
            .map(|&(sum, count)| vec![sum, count as f64, sum / count as f64])
            .collect();
        let k = MAX_CLUSTERS.min(daily.len() / 2);
        let normalized = stats::z_normalize(raw.clone());

        match kmeans(&normalized, k, CLUSTER_SEED) {
            Ok(fit) => {
                let mut clusters = BTreeMap::new();
                for i in 0..k {
                    let members: Vec<&Vec<f64>> = raw
                        .iter()
                        .zip(&fit.labels)
                        .filter(|(_, &label)| label == i)
                        .map(|(row, _)| row)
                        .collect();
                    let sums: Vec<f64> = members.iter().map(|row| row[0]).collect();
                    let counts: Vec<f64> = members.iter().map(|row| row[1]).collect();
                    let means: Vec<f64> = members.iter().map(|row| row[2]).collect();
                    let avg_daily_spending = stats::mean(&sums);
                    let avg_transactions_per_day = stats::mean(&counts);
                    clusters.insert(
                        format!("cluster_{}", i),
                        ClusterSummary {
                            size: members.len(),
                            avg_daily_spending,
                            avg_transactions_per_day,
                            avg_transaction_amount: stats::mean(&means),
                            description: describe_cluster(
                                avg_daily_spending,
                                avg_transactions_per_day,
                            )
                            .to_string(),
                        },
                    );
                }
                BehavioralClusters {
                    clusters,
                    total_clusters: k,
                    note: None,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "behavioral clustering failed");
                BehavioralClusters {
                    note: Some("Error in clustering analysis".to_string()),
                    ..Default::default()
                }
            }
        }
    }

    fn pattern_insights(&self, patterns: &PatternSections) -> Vec<String> {
        let mut insights = Vec::new();

        let mut top: Option<(&String, f64)> = None;
        for (category, &total) in &patterns.category_patterns.top_categories {
            if top.map_or(true, |(_, best)| total > best) {
                top = Some((category, total));
            }
        }
        if let Some((category, _)) = top {
            insights.push(format!("Your highest spending category is {}", category));
        }

        let increasing: Vec<&str> = patterns
            .category_patterns
            .category_trends
            .iter()
            .filter(|(_, &trend)| trend == TrendDirection::Increasing)
            .map(|(category, _)| category.as_str())
            .take(3)
            .collect();
        if !increasing.is_empty() {
            insights.push(format!("Spending is increasing in: {}", increasing.join(", ")));
        }

        if let Some(day) = &patterns.temporal_patterns.peak_spending_day {
            insights.push(format!("You spend the most on {}s", day));
        }

        let large = &patterns.amount_patterns.spending_tiers.large;
        if large.count > 0 {
            insights.push(format!(
                "You have {} large transactions averaging ${:.2}",
                large.count, large.avg
            ));
        }

        insights
    }
}

/// How a user tends to spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorType {
    DisciplinedPlanner,
    ModerateSpender,
    ImpulseSpender,
    SpontaneousSpender,
    AverageSpender,
    InsufficientData,
}

impl BehaviorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorType::DisciplinedPlanner => "disciplined_planner",
            BehaviorType::ModerateSpender => "moderate_spender",
            BehaviorType::ImpulseSpender => "impulse_spender",
            BehaviorType::SpontaneousSpender => "spontaneous_spender",
            BehaviorType::AverageSpender => "average_spender",
            BehaviorType::InsufficientData => "insufficient_data",
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            BehaviorType::DisciplinedPlanner => &[
                "Continue your excellent spending discipline",
                "Consider increasing your savings rate",
                "Explore investment opportunities",
            ],
            BehaviorType::ModerateSpender => &[
                "Set up automatic savings transfers",
                "Review and optimize your budget categories",
                "Track your progress monthly",
            ],
            BehaviorType::ImpulseSpender => &[
                "Implement a 24-hour waiting period for large purchases",
                "Set up spending alerts for your categories",
                "Consider using cash for discretionary spending",
            ],
            BehaviorType::SpontaneousSpender => &[
                "Create a weekly spending plan",
                "Set aside money for spontaneous purchases",
                "Use budgeting apps with real-time notifications",
            ],
            BehaviorType::AverageSpender => &[
                "Focus on one spending category to optimize",
                "Set up automatic bill payments",
                "Review your spending weekly",
            ],
            BehaviorType::InsufficientData => &["Continue monitoring your spending patterns"],
        }
    }
}

impl fmt::Display for BehaviorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BehaviorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disciplined_planner" => Ok(BehaviorType::DisciplinedPlanner),
            "moderate_spender" => Ok(BehaviorType::ModerateSpender),
            "impulse_spender" => Ok(BehaviorType::ImpulseSpender),
            "spontaneous_spender" => Ok(BehaviorType::SpontaneousSpender),
            "average_spender" => Ok(BehaviorType::AverageSpender),
            "insufficient_data" => Ok(BehaviorType::InsufficientData),
            _ => Err(Error::InvalidData(format!("unknown behavior type: {}", s))),
        }
    }
}

/// The four scores behind a behavior classification, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorMetrics {
    pub consistency: f64,
    pub budget_adherence: f64,
    pub impulse_ratio: f64,
    pub planning_score: f64,
}

impl BehaviorMetrics {
    /// Placeholder metrics when there is nothing to measure
    pub fn neutral() -> Self {
        Self {
            consistency: 0.5,
            budget_adherence: 0.5,
            impulse_ratio: 0.0,
            planning_score: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorReport {
    pub behavior_type: BehaviorType,
    pub metrics: BehaviorMetrics,
    pub recommendations: Vec<String>,
}

/// Assigns one of five behavior types from spending metrics
pub struct BehaviorClassifier;

impl Default for BehaviorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_spending_behavior(
        &self,
        transactions: &[Transaction],
        budgets: Option<&[Budget]>,
    ) -> BehaviorReport {
        let txs: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.has_finite_amount())
            .collect();
        if txs.is_empty() {
            return BehaviorReport {
                behavior_type: BehaviorType::InsufficientData,
                metrics: BehaviorMetrics::neutral(),
                recommendations: BehaviorType::InsufficientData
                    .recommendations()
                    .iter()
                    .map(|r| r.to_string())
                    .collect(),
            };
        }

        let metrics = behavior_metrics(&txs, budgets);
        let behavior_type = classify(&metrics);
        tracing::debug!(behavior = behavior_type.as_str(), "behavior classified");

        BehaviorReport {
            behavior_type,
            metrics,
            recommendations: behavior_type
                .recommendations()
                .iter()
                .map(|r| r.to_string())
                .collect(),
        }
    }
}

fn behavior_metrics(txs: &[&Transaction], _budgets: Option<&[Budget]>) -> BehaviorMetrics {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for &tx in txs {
        *daily.entry(tx.date.date_naive()).or_insert(0.0) += tx.amount;
    }
    let daily_sums: Vec<f64> = daily.values().copied().collect();
    let daily_mean = stats::mean(&daily_sums);
    let consistency = if daily_mean > 0.0 {
        stats::clamp01(1.0 - stats::std_dev(&daily_sums) / daily_mean)
    } else {
        0.0
    };

    let amounts: Vec<f64> = txs.iter().map(|tx| tx.amount).collect();
    let threshold = stats::percentile(&amounts, 90.0);
    let impulse_ratio =
        amounts.iter().filter(|&&a| a > threshold).count() as f64 / amounts.len() as f64;

    let weekend: f64 = txs
        .iter()
        .filter(|tx| tx.is_weekend())
        .map(|tx| tx.amount)
        .sum();
    let weekday: f64 = txs
        .iter()
        .filter(|tx| !tx.is_weekend())
        .map(|tx| tx.amount)
        .sum();
    let total = weekend + weekday;
    let planning_score = if total > 0.0 { weekday / total } else { 0.5 };

    BehaviorMetrics {
        consistency,
        // TODO: score adherence from `_budgets`; neutral until that lands
        budget_adherence: 0.5,
        impulse_ratio,
        planning_score,
    }
}

fn classify(metrics: &BehaviorMetrics) -> BehaviorType {
    if metrics.consistency > 0.7 && metrics.impulse_ratio < 0.1 && metrics.planning_score > 0.6 {
        BehaviorType::DisciplinedPlanner
    } else if metrics.consistency > 0.5 && metrics.impulse_ratio < 0.2 {
        BehaviorType::ModerateSpender
    } else if metrics.impulse_ratio > 0.3 {
        BehaviorType::ImpulseSpender
    } else if metrics.planning_score < 0.3 {
        BehaviorType::SpontaneousSpender
    } else {
        BehaviorType::AverageSpender
    }
}

fn tier(amounts: &[f64]) -> TierStats {
    TierStats {
        count: amounts.len(),
        total: amounts.iter().sum(),
        avg: stats::mean(amounts),
    }
}

fn describe_cluster(avg_spending: f64, avg_transactions: f64) -> &'static str {
    if avg_spending > 100.0 && avg_transactions > 5.0 {
        "High spending, high activity days"
    } else if avg_spending > 100.0 {
        "High spending, low activity days"
    } else if avg_transactions > 5.0 {
        "Low spending, high activity days"
    } else {
        "Low spending, low activity days"
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
