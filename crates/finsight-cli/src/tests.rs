//! CLI command tests
//!
//! These tests drive the command functions against temporary dataset files.

use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;

use crate::cli::{Cli, Commands};
use crate::commands;
use finsight_core::Severity;

const SAMPLE_DATASET: &str = r#"{
    "transactions": [
        {"id": 1, "amount": 45.0, "category": "food", "date": "2024-03-01T12:00:00Z", "merchant": "Corner Grocer"},
        {"id": 2, "amount": 52.0, "category": "food", "date": "2024-03-02T12:30:00Z", "merchant": "Corner Grocer"},
        {"id": 3, "amount": 48.0, "category": "food", "date": "2024-03-03T11:45:00Z"},
        {"id": 4, "amount": 15.99, "category": "entertainment", "date": "2024-03-04T20:00:00Z", "description": "Netflix monthly"},
        {"id": 5, "amount": 300.0, "category": "electronics", "date": "2024-03-05T15:00:00Z", "merchant": "Gadget Palace"},
        {"id": 6, "amount": 60.0, "category": "food", "date": "2024-03-06T12:15:00Z"}
    ],
    "budgets": [
        {"category": "food", "amount": 400.0},
        {"category": "entertainment", "amount": 50.0}
    ],
    "goals": [
        {"name": "Vacation", "targetAmount": 1200.0, "currentAmount": 480.0}
    ]
}"#;

fn dataset_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn json_dataset() -> NamedTempFile {
    dataset_file(SAMPLE_DATASET, ".json")
}

// ========== Dataset Loading ==========

#[test]
fn test_load_dataset_json() {
    let file = json_dataset();
    let dataset = commands::load_dataset(file.path()).unwrap();
    assert_eq!(dataset.transactions.len(), 6);
    assert_eq!(dataset.budgets.len(), 2);
    assert_eq!(dataset.goals.len(), 1);
}

#[test]
fn test_load_dataset_csv() {
    let file = dataset_file(
        "amount,category,date\n12.5,food,2024-03-01\n20.0,transport,2024-03-02\n",
        ".csv",
    );
    let dataset = commands::load_dataset(file.path()).unwrap();
    assert_eq!(dataset.transactions.len(), 2);
    assert!(dataset.budgets.is_empty());
    assert!(dataset.goals.is_empty());
}

#[test]
fn test_load_dataset_missing_file() {
    let result = commands::load_dataset(std::path::Path::new("/nonexistent/finsight.json"));
    assert!(result.is_err());
}

// ========== Command Smoke Tests ==========

#[test]
fn test_cmd_anomalies() {
    let file = json_dataset();
    assert!(commands::cmd_anomalies(file.path(), 1, None, false).is_ok());
    assert!(commands::cmd_anomalies(file.path(), 1, Some(Severity::High), true).is_ok());
}

#[test]
fn test_cmd_fraud() {
    let file = json_dataset();
    assert!(commands::cmd_fraud(file.path(), 1, false).is_ok());
}

#[test]
fn test_cmd_patterns() {
    let file = json_dataset();
    assert!(commands::cmd_patterns(file.path(), false).is_ok());
    assert!(commands::cmd_patterns(file.path(), true).is_ok());
}

#[test]
fn test_cmd_behavior() {
    let file = json_dataset();
    assert!(commands::cmd_behavior(file.path(), false).is_ok());
}

#[test]
fn test_cmd_predict() {
    let file = json_dataset();
    assert!(commands::cmd_predict(file.path(), 3, false).is_ok());
}

#[test]
fn test_cmd_cashflow() {
    let file = json_dataset();
    assert!(commands::cmd_cashflow(file.path(), 2, true).is_ok());
}

#[test]
fn test_cmd_budget() {
    let file = json_dataset();
    assert!(commands::cmd_budget(file.path(), 1, false).is_ok());
}

#[test]
fn test_cmd_health() {
    let file = json_dataset();
    assert!(commands::cmd_health(file.path(), false).is_ok());
}

#[test]
fn test_cmd_insights() {
    let file = json_dataset();
    assert!(commands::cmd_insights(file.path(), 1, false).is_ok());
}

// ========== Argument Parsing ==========

#[test]
fn test_cli_parses_predict_months() {
    let cli = Cli::try_parse_from(["finsight", "--file", "data.json", "predict", "--months", "6"])
        .unwrap();
    assert_eq!(cli.file.to_str(), Some("data.json"));
    match cli.command {
        Commands::Predict { months } => assert_eq!(months, 6),
        _ => panic!("expected predict subcommand"),
    }
}

#[test]
fn test_cli_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["finsight", "anomalies", "--json", "--user-id", "9"]).unwrap();
    assert!(cli.json);
    assert_eq!(cli.user_id, 9);
    match cli.command {
        Commands::Anomalies { min_severity } => assert!(min_severity.is_none()),
        _ => panic!("expected anomalies subcommand"),
    }
}
