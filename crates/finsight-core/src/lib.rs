//! Finsight Core Library
//!
//! Shared analytics for the Finsight transaction-insights engine:
//! - Rule-based and statistical anomaly detection (plus fraud patterns)
//! - Spending-pattern analysis and behavior classification
//! - Spending, cash-flow, and budget forecasting
//! - Composite financial-health scoring
//! - Insight generation from patterns, budgets, and goals
//! - Dataset loading (JSON and CSV) for the CLI and tests

pub mod anomaly;
pub mod cluster;
pub mod error;
pub mod forest;
pub mod health;
pub mod insights;
pub mod load;
pub mod models;
pub mod patterns;
pub mod predict;
pub mod regression;
pub mod stats;

pub use anomaly::{
    Anomaly, AnomalyConfig, AnomalyDetector, AnomalyType, FraudConfig, FraudDetector, Severity,
};
pub use error::{Error, Result};
pub use health::{HealthCalculator, HealthScore};
pub use insights::{Insight, InsightGenerator, InsightType};
pub use load::Dataset;
pub use models::{Budget, Goal, Transaction};
pub use patterns::{
    BehaviorClassifier, BehaviorMetrics, BehaviorReport, BehaviorType, PatternReport,
    SpendingPatternAnalyzer,
};
pub use predict::{
    BudgetForecast, BudgetPredictor, CashFlowPredictor, CashFlowResult, PredictionResult,
    SpendingPredictor,
};
