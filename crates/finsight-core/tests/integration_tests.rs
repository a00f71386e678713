//! Integration tests for finsight-core
//!
//! These tests exercise the public analytics surface end to end: anomaly and
//! fraud detection, pattern analysis, behavior classification, the three
//! predictors, health scoring and insight generation.

use chrono::{DateTime, Duration, Utc};

use finsight_core::models::parse_datetime;
use finsight_core::{
    AnomalyDetector, AnomalyType, BehaviorClassifier, BehaviorType, Budget, BudgetPredictor,
    CashFlowPredictor, Dataset, FraudDetector, Goal, HealthCalculator, InsightGenerator, Severity,
    SpendingPatternAnalyzer, SpendingPredictor, Transaction,
};

fn txn(id: i64, amount: f64, category: &str, date: &str) -> Transaction {
    txn_at(id, amount, category, parse_datetime(date).unwrap())
}

fn txn_at(id: i64, amount: f64, category: &str, date: DateTime<Utc>) -> Transaction {
    Transaction {
        id: Some(id),
        amount,
        category: category.to_string(),
        date,
        merchant: None,
        description: None,
    }
}

/// 29 ordinary purchases between $50 and $59 plus one $500 outlier
fn transactions_with_amount_outlier() -> Vec<Transaction> {
    let mut txs: Vec<Transaction> = (0..29)
        .map(|i| {
            txn(
                i + 1,
                50.0 + (i % 10) as f64,
                "food",
                &format!("2024-03-{:02}T12:00:00Z", i % 28 + 1),
            )
        })
        .collect();
    txs.push(txn(999, 500.0, "food", "2024-03-15T18:00:00Z"));
    txs
}

/// A varied history: groceries, entertainment subscriptions, a late-night
/// splurge, a one-off expensive merchant and a clear amount outlier
fn mixed_history() -> Vec<Transaction> {
    let mut txs = Vec::new();
    let mut id = 1;

    for day in 1..=20 {
        let mut tx = txn(
            id,
            40.0 + (day % 7) as f64 * 5.0,
            "food",
            &format!("2024-03-{:02}T12:30:00Z", day),
        );
        tx.merchant = Some("Corner Grocer".to_string());
        txs.push(tx);
        id += 1;
    }
    for day in [2, 9, 16, 23] {
        let mut tx = txn(
            id,
            15.99,
            "entertainment",
            &format!("2024-03-{:02}T20:00:00Z", day),
        );
        tx.merchant = Some("Streamflix".to_string());
        tx.description = Some("Netflix monthly subscription".to_string());
        txs.push(tx);
        id += 1;
    }
    for day in [3, 10, 17] {
        let mut tx = txn(
            id,
            9.99,
            "entertainment",
            &format!("2024-03-{:02}T07:45:00Z", day),
        );
        tx.description = Some("Spotify subscription".to_string());
        txs.push(tx);
        id += 1;
    }

    // late-night splurge above the median
    txs.push(txn(id, 180.0, "shopping", "2024-03-12T23:40:00Z"));
    id += 1;

    // single visit to an unusually expensive merchant
    let mut tx = txn(id, 320.0, "electronics", "2024-03-14T15:00:00Z");
    tx.merchant = Some("Gadget Palace".to_string());
    txs.push(tx);
    id += 1;

    // outright amount outlier
    txs.push(txn(id, 700.0, "travel", "2024-03-21T11:00:00Z"));

    txs
}

// ============================================================================
// Anomaly Detection
// ============================================================================

#[test]
fn test_amount_outlier_is_flagged_high_or_medium() {
    let txs = transactions_with_amount_outlier();
    let anomalies = AnomalyDetector::new().detect_all_anomalies(1, &txs);

    let flagged = anomalies.iter().any(|a| {
        a.transaction_id == Some(999)
            && a.anomaly_type == AnomalyType::UnusualAmount
            && (a.severity == Severity::High || a.severity == Severity::Medium)
    });
    assert!(flagged, "the $500 transaction should be flagged");
}

#[test]
fn test_two_transactions_never_make_a_category_anomaly() {
    // a 1000x deviation, but only two data points in the category
    let txs = vec![
        txn(1, 10.0, "gadgets", "2024-03-01T12:00:00Z"),
        txn(2, 10000.0, "gadgets", "2024-03-08T12:00:00Z"),
    ];
    let anomalies = AnomalyDetector::new().detect_all_anomalies(1, &txs);
    assert!(!anomalies
        .iter()
        .any(|a| a.anomaly_type == AnomalyType::UnusualCategory));
}

#[test]
fn test_all_anomaly_confidences_stay_in_range() {
    let txs = mixed_history();
    let detector = AnomalyDetector::new();
    let fraud = FraudDetector::new();

    let mut anomalies = detector.detect_all_anomalies(42, &txs);
    anomalies.extend(fraud.detect_fraud_patterns(42, &txs));

    assert!(!anomalies.is_empty());
    for anomaly in &anomalies {
        assert!(
            (0.0..=1.0).contains(&anomaly.confidence_score),
            "confidence {} out of range for {:?}",
            anomaly.confidence_score,
            anomaly.anomaly_type
        );
        assert_eq!(anomaly.user_id, 42);
    }
}

// ============================================================================
// Fraud Detection
// ============================================================================

#[test]
fn test_rapid_burst_raises_high_severity_alert() {
    let start = parse_datetime("2024-03-05T10:00:00Z").unwrap();
    let txs: Vec<Transaction> = (0..5)
        .map(|i| txn_at(i + 1, 25.0, "shopping", start + Duration::minutes(i * 5)))
        .collect();

    let alerts = FraudDetector::new().detect_fraud_patterns(7, &txs);
    assert!(alerts
        .iter()
        .any(|a| a.anomaly_type == AnomalyType::UnusualTime && a.severity == Severity::High));
}

#[test]
fn test_daily_spaced_transactions_are_not_rapid() {
    let start = parse_datetime("2024-03-05T10:00:00Z").unwrap();
    let txs: Vec<Transaction> = (0..5)
        .map(|i| txn_at(i + 1, 25.0, "shopping", start + Duration::days(i)))
        .collect();

    let alerts = FraudDetector::new().detect_fraud_patterns(7, &txs);
    assert!(!alerts
        .iter()
        .any(|a| a.anomaly_type == AnomalyType::UnusualTime));
}

// ============================================================================
// Pattern Analysis & Behavior
// ============================================================================

#[test]
fn test_pattern_analysis_is_idempotent() {
    let txs = mixed_history();
    let analyzer = SpendingPatternAnalyzer::new();

    let first = analyzer.analyze_spending_patterns(&txs);
    let second = analyzer.analyze_spending_patterns(&txs);

    let first_patterns = serde_json::to_value(&first.patterns).unwrap();
    let second_patterns = serde_json::to_value(&second.patterns).unwrap();
    assert_eq!(first_patterns, second_patterns);
    assert_eq!(first.insights, second.insights);
}

#[test]
fn test_constant_daily_spending_is_not_impulsive() {
    let start = parse_datetime("2024-03-01T12:00:00Z").unwrap();
    let txs: Vec<Transaction> = (0..30)
        .map(|i| txn_at(i + 1, 50.0, "food", start + Duration::days(i)))
        .collect();

    let report = BehaviorClassifier::new().classify_spending_behavior(&txs, None);
    assert!(
        report.behavior_type == BehaviorType::DisciplinedPlanner
            || report.behavior_type == BehaviorType::ModerateSpender,
        "got {:?}",
        report.behavior_type
    );
    assert!(report.metrics.impulse_ratio < 0.1);
}

// ============================================================================
// Prediction
// ============================================================================

#[test]
fn test_empty_history_prediction_defaults() {
    let result = SpendingPredictor::new().predict_spending(&[], 3);
    assert_eq!(result.total_predicted, 0.0);
    assert_eq!(result.monthly_breakdown, vec![0.0, 0.0, 0.0]);
    assert_eq!(result.confidence_score, 0.3);
}

#[test]
fn test_prediction_confidence_stays_in_range() {
    let txs = mixed_history();
    let result = SpendingPredictor::new().predict_spending(&txs, 2);
    assert!((0.0..=1.0).contains(&result.confidence_score));
    assert_eq!(result.monthly_breakdown.len(), 2);

    let cash = CashFlowPredictor::new().predict_cash_flow(&txs, 2);
    assert_eq!(cash.monthly_projections.len(), 2);
}

#[test]
fn test_current_month_overshoot_is_flagged_at_risk() {
    // spend 220 this month against a 200 budget
    let now = Utc::now();
    let txs = vec![
        txn_at(1, 110.0, "food", now),
        txn_at(2, 110.0, "food", now),
    ];
    let budgets = vec![Budget {
        category: "food".to_string(),
        amount: 200.0,
    }];

    let forecast = BudgetPredictor::new().forecast_budget_performance(&budgets, &txs, 1);
    assert_eq!(forecast.at_risk_categories.len(), 1);
    assert_eq!(forecast.at_risk_categories[0].name, "food");
    assert!((0.0..=1.0).contains(&forecast.overall_adherence_score));
}

// ============================================================================
// Health Score & Insights
// ============================================================================

#[test]
fn test_health_score_handles_empty_inputs() {
    let score = HealthCalculator::new().calculate_financial_health_score(&[], &[], &[]);
    for value in [
        score.overall_score,
        score.spending_score,
        score.savings_score,
        score.budget_adherence_score,
        score.debt_score,
    ] {
        assert!((0.0..=1.0).contains(&value), "sub-score {} out of range", value);
    }
    assert!(!score.factors.is_empty());
    assert!(!score.recommendations.is_empty());
}

#[test]
fn test_full_pipeline_confidences_stay_in_range() {
    let txs = mixed_history();
    let budgets = vec![
        Budget {
            category: "food".to_string(),
            amount: 200.0,
        },
        Budget {
            category: "entertainment".to_string(),
            amount: 50.0,
        },
    ];
    let goals = vec![Goal {
        name: "Vacation".to_string(),
        target_amount: 1000.0,
        current_amount: 300.0,
        target_date: Some(Utc::now() + Duration::days(60)),
    }];

    let insights = InsightGenerator::new().generate_insights(9, &txs, &budgets, &goals);
    assert!(!insights.is_empty());
    for insight in &insights {
        assert!(
            (0.0..=1.0).contains(&insight.confidence_score),
            "confidence {} out of range for {}",
            insight.confidence_score,
            insight.title
        );
        assert!(!insight.action_items.is_empty());
    }

    let score = HealthCalculator::new().calculate_financial_health_score(&txs, &budgets, &goals);
    assert!((0.0..=1.0).contains(&score.overall_score));
}

// ============================================================================
// Dataset Loading
// ============================================================================

#[test]
fn test_json_dataset_feeds_the_detectors() {
    let data = r#"{
        "transactions": [
            {"id": 1, "amount": 52.0, "category": "food", "date": "2024-03-01T12:00:00Z"},
            {"id": 2, "amount": 48.0, "category": "food", "date": "2024-03-02T12:00:00Z"},
            {"id": 3, "amount": 55.0, "category": "food", "date": "2024-03-03"},
            {"id": 4, "amount": "broken", "category": "food", "date": "2024-03-04"}
        ],
        "budgets": [{"category": "food", "amount": 300.0}],
        "goals": []
    }"#;
    let dataset = Dataset::from_json_str(data).unwrap();
    assert_eq!(dataset.transactions.len(), 3);
    assert_eq!(dataset.budgets.len(), 1);

    // the loaded records run through detection without issue
    let anomalies = AnomalyDetector::new().detect_all_anomalies(1, &dataset.transactions);
    for anomaly in &anomalies {
        assert!((0.0..=1.0).contains(&anomaly.confidence_score));
    }
}
