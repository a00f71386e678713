//! Spending, cash-flow and budget forecast commands

use std::path::Path;

use anyhow::Result;

use finsight_core::{BudgetPredictor, CashFlowPredictor, SpendingPredictor};

use super::{load_dataset, print_json};

pub fn cmd_predict(file: &Path, months: u32, json: bool) -> Result<()> {
    let dataset = load_dataset(file)?;
    let predictor = SpendingPredictor::new();
    let result = predictor.predict_spending(&dataset.transactions, months);

    if json {
        return print_json(&result);
    }

    println!();
    println!("📈 Spending Forecast ({} months)", months);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total predicted: ${:.2}", result.total_predicted);
    println!(
        "   Confidence: {:.2}   Trend: {:+.1}%",
        result.confidence_score,
        result.trend * 100.0
    );
    for (index, amount) in result.monthly_breakdown.iter().enumerate() {
        println!("   Month {}: ${:.2}", index + 1, amount);
    }
    if !result.category_predictions.is_empty() {
        println!("   By category:");
        for (category, amount) in &result.category_predictions {
            println!("     {:<20} ${:>10.2}", category, amount);
        }
    }
    Ok(())
}

pub fn cmd_cashflow(file: &Path, months: u32, json: bool) -> Result<()> {
    let dataset = load_dataset(file)?;
    let predictor = CashFlowPredictor::new();
    let result = predictor.predict_cash_flow(&dataset.transactions, months);

    if json {
        return print_json(&result);
    }

    println!();
    println!("💸 Cash Flow Projection ({} months)", months);
    println!("   ─────────────────────────────────────────────────────────────");
    for projection in &result.monthly_projections {
        println!(
            "   Month {}: income ${:.2} | expenses ${:.2} | net ${:.2}",
            projection.month + 1,
            projection.projected_income,
            projection.projected_expenses,
            projection.net_cash_flow
        );
    }
    println!(
        "   Totals:  income ${:.2} | expenses ${:.2} | net ${:.2}",
        result.total_projected_income,
        result.total_projected_expenses,
        result.net_cash_flow
    );
    Ok(())
}

pub fn cmd_budget(file: &Path, months: u32, json: bool) -> Result<()> {
    let dataset = load_dataset(file)?;
    let predictor = BudgetPredictor::new();
    let forecast =
        predictor.forecast_budget_performance(&dataset.budgets, &dataset.transactions, months);

    if json {
        return print_json(&forecast);
    }

    println!();
    println!("🎯 Budget Forecast ({} months)", months);
    println!("   ─────────────────────────────────────────────────────────────");
    if forecast.category_forecasts.is_empty() {
        println!("   No budget and transaction data to compare.");
    }
    for category in &forecast.category_forecasts {
        println!(
            "   {:<20} budgeted ${:>9.2}  predicted ${:>9.2}",
            category.category, category.budgeted, category.predicted
        );
    }
    if !forecast.at_risk_categories.is_empty() {
        println!("   At risk:");
        for risk in &forecast.at_risk_categories {
            println!(
                "     {}: ${:.2} over ({:.1}%)",
                risk.name, risk.predicted_overage, risk.risk_percentage
            );
        }
    }
    println!(
        "   Adherence score: {:.2}",
        forecast.overall_adherence_score
    );
    println!("   Recommendations:");
    for recommendation in &forecast.recommendations {
        println!("   - {}", recommendation);
    }
    Ok(())
}
