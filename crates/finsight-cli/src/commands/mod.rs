//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `detect` - Anomaly and fraud detection commands
//! - `analyze` - Pattern analysis and behavior classification commands
//! - `forecast` - Spending, cash-flow and budget forecast commands
//! - `report` - Health score and insight generation commands

pub mod analyze;
pub mod detect;
pub mod forecast;
pub mod report;

// Re-export command functions for main.rs
pub use analyze::*;
pub use detect::*;
pub use forecast::*;
pub use report::*;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use finsight_core::load::read_transactions_csv;
use finsight_core::Dataset;

/// Load the input dataset, dispatching on file extension
///
/// `.csv` files are read as a plain transaction table; anything else is
/// parsed as JSON.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let dataset = match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => Dataset {
            transactions: read_transactions_csv(path)
                .with_context(|| format!("Failed to read csv file: {}", path.display()))?,
            ..Default::default()
        },
        _ => Dataset::from_json_file(path)
            .with_context(|| format!("Failed to read dataset file: {}", path.display()))?,
    };
    tracing::debug!(
        transactions = dataset.transactions.len(),
        budgets = dataset.budgets.len(),
        goals = dataset.goals.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Pretty-print a result as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
