//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Finsight - spending anomalies, patterns, forecasts and insights
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Analytics for personal transaction histories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Input dataset: a JSON object with transactions/budgets/goals arrays,
    /// a bare JSON transaction array, or a transactions CSV
    #[arg(short, long, default_value = "finsight.json", global = true)]
    pub file: PathBuf,

    /// User id attached to generated anomalies and insights
    #[arg(long, default_value_t = 1, global = true)]
    pub user_id: i64,

    /// Print raw JSON instead of a formatted summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect spending anomalies across all detectors
    Anomalies {
        /// Only report anomalies at or above this severity (low, medium, high)
        #[arg(long)]
        min_severity: Option<String>,
    },

    /// Scan for fraud patterns (rapid bursts, large recent transactions)
    Fraud,

    /// Analyze spending patterns by category, time, amount and merchant
    Patterns,

    /// Classify overall spending behavior
    Behavior,

    /// Predict spending for the coming months
    Predict {
        /// Number of months to predict
        #[arg(short, long, default_value_t = 3)]
        months: u32,
    },

    /// Project monthly cash flow
    Cashflow {
        /// Number of months to project
        #[arg(short, long, default_value_t = 3)]
        months: u32,
    },

    /// Forecast budget performance per category
    Budget {
        /// Forecast horizon in months
        #[arg(short, long, default_value_t = 1)]
        months: u32,
    },

    /// Calculate the composite financial health score
    Health,

    /// Generate insights from transactions, budgets and goals
    Insights,
}
