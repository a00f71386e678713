//! Finsight CLI - transaction analytics toolkit
//!
//! Usage:
//!   finsight --file data.json anomalies       Detect spending anomalies
//!   finsight --file data.json patterns        Analyze spending patterns
//!   finsight --file data.csv predict -m 6     Predict six months of spending
//!   finsight --file data.json health          Compute the financial health score

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use finsight_core::Severity;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Anomalies { min_severity } => {
            let min_severity = min_severity
                .as_deref()
                .map(str::parse::<Severity>)
                .transpose()?;
            commands::cmd_anomalies(&cli.file, cli.user_id, min_severity, cli.json)
        }
        Commands::Fraud => commands::cmd_fraud(&cli.file, cli.user_id, cli.json),
        Commands::Patterns => commands::cmd_patterns(&cli.file, cli.json),
        Commands::Behavior => commands::cmd_behavior(&cli.file, cli.json),
        Commands::Predict { months } => commands::cmd_predict(&cli.file, months, cli.json),
        Commands::Cashflow { months } => commands::cmd_cashflow(&cli.file, months, cli.json),
        Commands::Budget { months } => commands::cmd_budget(&cli.file, months, cli.json),
        Commands::Health => commands::cmd_health(&cli.file, cli.json),
        Commands::Insights => commands::cmd_insights(&cli.file, cli.user_id, cli.json),
    }
}
