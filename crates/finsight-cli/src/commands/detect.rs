//! Anomaly and fraud detection commands

use std::path::Path;

use anyhow::Result;

use finsight_core::{Anomaly, AnomalyDetector, FraudDetector, Severity};

use super::{load_dataset, print_json};

pub fn cmd_anomalies(
    file: &Path,
    user_id: i64,
    min_severity: Option<Severity>,
    json: bool,
) -> Result<()> {
    let dataset = load_dataset(file)?;
    let detector = AnomalyDetector::new();
    let mut anomalies = detector.detect_all_anomalies(user_id, &dataset.transactions);
    if let Some(min) = min_severity {
        anomalies.retain(|anomaly| anomaly.severity.priority() >= min.priority());
    }

    if json {
        return print_json(&anomalies);
    }

    println!();
    println!("🚨 Anomaly Report");
    println!("   Transactions analyzed: {}", dataset.transactions.len());
    println!("   ─────────────────────────────────────────────────────────────");
    print_anomaly_lines(&anomalies);
    Ok(())
}

pub fn cmd_fraud(file: &Path, user_id: i64, json: bool) -> Result<()> {
    let dataset = load_dataset(file)?;
    let detector = FraudDetector::new();
    let alerts = detector.detect_fraud_patterns(user_id, &dataset.transactions);

    if json {
        return print_json(&alerts);
    }

    println!();
    println!("🔍 Fraud Scan");
    println!("   Transactions analyzed: {}", dataset.transactions.len());
    println!("   ─────────────────────────────────────────────────────────────");
    print_anomaly_lines(&alerts);
    Ok(())
}

fn print_anomaly_lines(anomalies: &[Anomaly]) {
    if anomalies.is_empty() {
        println!("   Nothing detected.");
        return;
    }
    for anomaly in anomalies {
        println!(
            "   [{:<6}] {:<18} conf {:.2}  {}",
            anomaly.severity.as_str(),
            anomaly.anomaly_type.as_str(),
            anomaly.confidence_score,
            anomaly.explanation
        );
    }
    println!();
    println!("   {} finding(s)", anomalies.len());
}
