//! Transaction anomaly and fraud detection
//!
//! `AnomalyDetector` runs five independent passes over a user's transactions:
//!
//! - amounts far above the user's own average
//! - amounts unusual for their category
//! - late-night activity and weekend spending spikes
//! - first-time merchants charging well above the norm
//! - a multivariate isolation-forest pass over amount/time/category features
//!
//! Passes do not deduplicate against each other; one transaction can appear
//! in several findings. `FraudDetector` is a separate, narrower scan used by
//! the fraud-alert path: rapid consecutive transactions and very large recent
//! charges.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::forest::{ForestConfig, IsolationForest};
use crate::models::Transaction;
use crate::stats;

/// How urgent a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Numeric rank for sorting, higher is more urgent
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(Error::InvalidData(format!("unknown severity: {}", s))),
        }
    }
}

/// What kind of irregularity a finding describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    UnusualAmount,
    UnusualCategory,
    UnusualTime,
    UnusualMerchant,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::UnusualAmount => "unusual_amount",
            AnomalyType::UnusualCategory => "unusual_category",
            AnomalyType::UnusualTime => "unusual_time",
            AnomalyType::UnusualMerchant => "unusual_merchant",
        }
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnomalyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unusual_amount" => Ok(AnomalyType::UnusualAmount),
            "unusual_category" => Ok(AnomalyType::UnusualCategory),
            "unusual_time" => Ok(AnomalyType::UnusualTime),
            "unusual_merchant" => Ok(AnomalyType::UnusualMerchant),
            _ => Err(Error::InvalidData(format!("unknown anomaly type: {}", s))),
        }
    }
}

/// One detected irregularity
///
/// `transaction_id` is set when the finding points at a single transaction
/// and left empty for aggregate findings (weekend spikes, rapid bursts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i64>,
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    pub confidence_score: f64,
    pub explanation: String,
    pub suggested_actions: Vec<String>,
    pub detected_at: DateTime<Utc>,
}

impl Anomaly {
    pub fn new(
        user_id: i64,
        anomaly_type: AnomalyType,
        severity: Severity,
        confidence: f64,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            transaction_id: None,
            anomaly_type,
            severity,
            confidence_score: stats::clamp01(confidence),
            explanation: explanation.into(),
            suggested_actions: Vec::new(),
            detected_at: Utc::now(),
        }
    }

    pub fn with_transaction(mut self, id: Option<i64>) -> Self {
        self.transaction_id = id;
        self
    }

    pub fn with_actions(mut self, actions: &[&str]) -> Self {
        self.suggested_actions = actions.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// Thresholds for the anomaly passes
#[derive(Debug, Clone)]
pub struct AnomalyConfig {
    pub amount_sigma: f64,
    pub category_sigma: f64,
    pub category_min_count: usize,
    pub night_start_hour: u32,
    pub night_end_hour: u32,
    pub weekend_ratio: f64,
    pub weekend_window_days: i64,
    pub merchant_multiplier: f64,
    pub statistical_min_count: usize,
    pub forest: ForestConfig,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            amount_sigma: 3.0,         // flag amounts beyond mean + 3 sigma
            category_sigma: 2.5,       // per-category threshold multiplier
            category_min_count: 3,     // skip thinner categories
            night_start_hour: 23,      // late-night window opens
            night_end_hour: 5,         // late-night window closes (inclusive)
            weekend_ratio: 2.0,        // weekend vs weekday average trigger
            weekend_window_days: 14,   // recent-weekend lookback
            merchant_multiplier: 1.5,  // first-visit amount vs overall mean
            statistical_min_count: 10, // minimum sample for the forest pass
            forest: ForestConfig::default(),
        }
    }
}

/// Runs the five anomaly passes over one user's transactions
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self {
            config: AnomalyConfig::default(),
        }
    }

    pub fn with_config(config: AnomalyConfig) -> Self {
        Self { config }
    }

    /// All findings from every pass, concatenated
    ///
    /// The statistical pass can fail on degenerate feature matrices; that is
    /// logged and the remaining passes' findings are still returned.
    pub fn detect_all_anomalies(&self, user_id: i64, transactions: &[Transaction]) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();
        anomalies.extend(self.amount_anomalies(user_id, transactions));
        anomalies.extend(self.category_anomalies(user_id, transactions));
        anomalies.extend(self.time_anomalies(user_id, transactions));
        anomalies.extend(self.merchant_anomalies(user_id, transactions));
        match self.statistical_anomalies(user_id, transactions) {
            Ok(found) => anomalies.extend(found),
            Err(e) => {
                tracing::error!(user_id, error = %e, "statistical anomaly pass failed");
            }
        }

        tracing::debug!(user_id, count = anomalies.len(), "anomaly detection complete");
        anomalies
    }

    fn amount_anomalies(&self, user_id: i64, transactions: &[Transaction]) -> Vec<Anomaly> {
        let amounts = finite_amounts(transactions);
        if amounts.is_empty() {
            return Vec::new();
        }
        let mean = stats::mean(&amounts);
        let std = stats::std_dev(&amounts);
        if std == 0.0 {
            return Vec::new();
        }

        let threshold = mean + self.config.amount_sigma * std;
        transactions
            .iter()
            .filter(|tx| tx.has_finite_amount() && tx.amount > threshold)
            .map(|tx| {
                let z = stats::z_score(tx.amount, mean, std);
                let severity = if z > 4.0 {
                    Severity::High
                } else if z > 3.0 {
                    Severity::Medium
                } else {
                    Severity::Low
                };
                Anomaly::new(
                    user_id,
                    AnomalyType::UnusualAmount,
                    severity,
                    (z / self.config.amount_sigma).min(0.95),
                    format!(
                        "Transaction amount ${:.2} is significantly higher than your average of ${:.2}",
                        tx.amount, mean
                    ),
                )
                .with_transaction(tx.id)
                .with_actions(&[
                    "Verify this transaction is legitimate",
                    "Check if this was a planned large purchase",
                    "Review your budget for this category",
                ])
            })
            .collect()
    }

    fn category_anomalies(&self, user_id: i64, transactions: &[Transaction]) -> Vec<Anomaly> {
        let mut by_category: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for tx in transactions.iter().filter(|tx| tx.has_finite_amount()) {
            by_category.entry(tx.category.as_str()).or_default().push(tx);
        }

        let mut anomalies = Vec::new();
        for (category, txs) in by_category {
            if txs.len() < self.config.category_min_count {
                continue;
            }
            let amounts: Vec<f64> = txs.iter().map(|tx| tx.amount).collect();
            let mean = stats::mean(&amounts);
            let std = stats::std_dev(&amounts);
            if std == 0.0 {
                continue;
            }

            let threshold = mean + self.config.category_sigma * std;
            for tx in txs.iter().filter(|tx| tx.amount > threshold) {
                let z = stats::z_score(tx.amount, mean, std);
                let severity = if z > 3.0 {
                    Severity::High
                } else if z > 2.0 {
                    Severity::Medium
                } else {
                    Severity::Low
                };
                anomalies.push(
                    Anomaly::new(
                        user_id,
                        AnomalyType::UnusualCategory,
                        severity,
                        (z / self.config.category_sigma).min(0.9),
                        format!(
                            "${:.2} spending in {} is unusual (average: ${:.2})",
                            tx.amount, category, mean
                        ),
                    )
                    .with_transaction(tx.id)
                    .with_actions(&[
                        &format!("Review your {} spending pattern", category),
                        "Check if this category needs budget adjustment",
                        "Verify the transaction category is correct",
                    ]),
                );
            }
        }
        anomalies
    }

    fn time_anomalies(&self, user_id: i64, transactions: &[Transaction]) -> Vec<Anomaly> {
        let amounts = finite_amounts(transactions);
        if amounts.is_empty() {
            return Vec::new();
        }
        let median = stats::median(&amounts);

        let mut anomalies: Vec<Anomaly> = transactions
            .iter()
            .filter(|tx| {
                let hour = tx.date.hour();
                tx.has_finite_amount()
                    && (hour >= self.config.night_start_hour || hour <= self.config.night_end_hour)
                    && tx.amount > median
            })
            .map(|tx| {
                Anomaly::new(
                    user_id,
                    AnomalyType::UnusualTime,
                    Severity::Medium,
                    0.7,
                    format!(
                        "Transaction at {} is outside normal hours",
                        tx.date.format("%H:%M")
                    ),
                )
                .with_transaction(tx.id)
                .with_actions(&[
                    "Verify you made this transaction",
                    "Check for unauthorized account access",
                    "Review recent account activity",
                ])
            })
            .collect();

        if let Some(spike) = self.weekend_spike(user_id, transactions) {
            anomalies.push(spike);
        }
        anomalies
    }

    /// Aggregate check: is recent weekend spending running hot?
    fn weekend_spike(&self, user_id: i64, transactions: &[Transaction]) -> Option<Anomaly> {
        let weekend: Vec<f64> = transactions
            .iter()
            .filter(|tx| tx.has_finite_amount() && tx.is_weekend())
            .map(|tx| tx.amount)
            .collect();
        let weekday: Vec<f64> = transactions
            .iter()
            .filter(|tx| tx.has_finite_amount() && !tx.is_weekend())
            .map(|tx| tx.amount)
            .collect();
        if weekend.is_empty() || weekday.is_empty() {
            return None;
        }

        let weekend_avg = stats::mean(&weekend);
        let weekday_avg = stats::mean(&weekday);
        if weekend_avg <= self.config.weekend_ratio * weekday_avg {
            return None;
        }

        // recency is relative to the newest transaction, not the wall clock
        let latest = transactions.iter().map(|tx| tx.date).max()?;
        let cutoff = latest - Duration::days(self.config.weekend_window_days);
        let recent_sum: f64 = transactions
            .iter()
            .filter(|tx| tx.has_finite_amount() && tx.is_weekend() && tx.date >= cutoff)
            .map(|tx| tx.amount)
            .sum();
        if recent_sum <= 2.0 * weekend_avg {
            return None;
        }

        Some(
            Anomaly::new(
                user_id,
                AnomalyType::UnusualTime,
                Severity::Low,
                0.6,
                "Recent weekend spending is significantly higher than usual",
            )
            .with_actions(&[
                "Review weekend spending habits",
                "Consider setting weekend spending limits",
                "Plan weekend activities within budget",
            ]),
        )
    }

    fn merchant_anomalies(&self, user_id: i64, transactions: &[Transaction]) -> Vec<Anomaly> {
        let amounts = finite_amounts(transactions);
        if amounts.is_empty() {
            return Vec::new();
        }
        let overall_mean = stats::mean(&amounts);

        let mut by_merchant: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for tx in transactions.iter().filter(|tx| tx.has_finite_amount()) {
            if let Some(merchant) = tx.merchant.as_deref() {
                by_merchant.entry(merchant).or_default().push(tx);
            }
        }

        let mut anomalies = Vec::new();
        for (merchant, txs) in by_merchant {
            if txs.len() != 1 {
                continue;
            }
            let tx = txs[0];
            if tx.amount > self.config.merchant_multiplier * overall_mean {
                anomalies.push(
                    Anomaly::new(
                        user_id,
                        AnomalyType::UnusualMerchant,
                        Severity::Medium,
                        0.65,
                        format!("First transaction with {} for ${:.2}", merchant, tx.amount),
                    )
                    .with_transaction(tx.id)
                    .with_actions(&[
                        "Verify this merchant is legitimate",
                        "Check if you recognize this purchase",
                        "Monitor future transactions with this merchant",
                    ]),
                );
            }
        }
        anomalies
    }

    fn statistical_anomalies(
        &self,
        user_id: i64,
        transactions: &[Transaction],
    ) -> crate::error::Result<Vec<Anomaly>> {
        let txs: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.has_finite_amount())
            .collect();
        if txs.len() < self.config.statistical_min_count {
            return Ok(Vec::new());
        }

        let mut category_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for tx in &txs {
            *category_counts.entry(tx.category.as_str()).or_insert(0) += 1;
        }

        let rows: Vec<Vec<f64>> = txs
            .iter()
            .map(|tx| {
                vec![
                    tx.amount,
                    tx.date.hour() as f64,
                    tx.weekday_index() as f64,
                    tx.date.day() as f64,
                    category_counts[tx.category.as_str()] as f64,
                ]
            })
            .collect();
        let rows = stats::z_normalize(rows);

        let forest = IsolationForest::fit(&rows, &self.config.forest)?;
        let mut anomalies = Vec::new();
        for (tx, row) in txs.iter().zip(&rows) {
            let decision = forest.decision(row);
            if decision >= 0.0 {
                continue;
            }
            let confidence = (2.0 * decision.abs()).min(0.9);
            let severity = if confidence > 0.8 {
                Severity::High
            } else if confidence > 0.6 {
                Severity::Medium
            } else {
                Severity::Low
            };
            anomalies.push(
                Anomaly::new(
                    user_id,
                    AnomalyType::UnusualAmount,
                    severity,
                    confidence,
                    format!(
                        "Statistical analysis flagged this ${:.2} transaction as unusual",
                        tx.amount
                    ),
                )
                .with_transaction(tx.id)
                .with_actions(&[
                    "Review this transaction for accuracy",
                    "Check if this represents a change in spending pattern",
                    "Verify the transaction details",
                ]),
            );
        }
        Ok(anomalies)
    }
}

/// Thresholds for the fraud scan
#[derive(Debug, Clone)]
pub struct FraudConfig {
    pub rapid_count: usize,
    pub rapid_window_secs: i64,
    pub large_multiplier: f64,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            rapid_count: 5,          // consecutive transactions per window
            rapid_window_secs: 3600, // window span that counts as rapid
            large_multiplier: 5.0,   // recent amount vs overall mean
        }
    }
}

/// Narrow scan for likely-fraudulent activity
pub struct FraudDetector {
    config: FraudConfig,
}

impl Default for FraudDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FraudDetector {
    pub fn new() -> Self {
        Self {
            config: FraudConfig::default(),
        }
    }

    pub fn with_config(config: FraudConfig) -> Self {
        Self { config }
    }

    pub fn detect_fraud_patterns(&self, user_id: i64, transactions: &[Transaction]) -> Vec<Anomaly> {
        let mut alerts = self.rapid_transactions(user_id, transactions);
        alerts.extend(self.large_transactions(user_id, transactions, Utc::now()));
        tracing::debug!(user_id, count = alerts.len(), "fraud scan complete");
        alerts
    }

    fn rapid_transactions(&self, user_id: i64, transactions: &[Transaction]) -> Vec<Anomaly> {
        let mut txs: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.has_finite_amount())
            .collect();
        if txs.len() < self.config.rapid_count {
            return Vec::new();
        }
        txs.sort_by_key(|tx| tx.date);

        // every qualifying window alerts; overlapping windows are not merged
        let mut alerts = Vec::new();
        for window in txs.windows(self.config.rapid_count) {
            let span = window[window.len() - 1].date - window[0].date;
            if span.num_seconds() > self.config.rapid_window_secs {
                continue;
            }
            let total: f64 = window.iter().map(|tx| tx.amount).sum();
            let minutes = span.num_seconds() as f64 / 60.0;
            alerts.push(
                Anomaly::new(
                    user_id,
                    AnomalyType::UnusualTime,
                    Severity::High,
                    0.9,
                    format!(
                        "{} transactions totaling ${:.2} in {:.1} minutes",
                        self.config.rapid_count, total, minutes
                    ),
                )
                .with_actions(&[
                    "Immediately check your card and account",
                    "Contact your bank if you didn't make these transactions",
                    "Consider freezing your card temporarily",
                ]),
            );
        }
        alerts
    }

    fn large_transactions(
        &self,
        user_id: i64,
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Vec<Anomaly> {
        let amounts = finite_amounts(transactions);
        if amounts.is_empty() {
            return Vec::new();
        }
        let threshold = self.config.large_multiplier * stats::mean(&amounts);

        transactions
            .iter()
            .filter(|tx| {
                tx.has_finite_amount()
                    && tx.amount > threshold
                    && (now - tx.date).num_days() <= 1
            })
            .map(|tx| {
                Anomaly::new(
                    user_id,
                    AnomalyType::UnusualAmount,
                    Severity::High,
                    0.85,
                    format!(
                        "Large transaction of ${:.2} detected ({}x your average)",
                        tx.amount, self.config.large_multiplier
                    ),
                )
                .with_transaction(tx.id)
                .with_actions(&[
                    "Verify you authorized this transaction",
                    "Check transaction details and merchant",
                    "Contact your bank if suspicious",
                ])
            })
            .collect()
    }
}

fn finite_amounts(transactions: &[Transaction]) -> Vec<f64> {
    transactions
        .iter()
        .filter(|tx| tx.has_finite_amount())
        .map(|tx| tx.amount)
        .collect()
}
