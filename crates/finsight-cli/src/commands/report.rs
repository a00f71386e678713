//! Health score and insight generation commands

use std::path::Path;

use anyhow::Result;

use finsight_core::{HealthCalculator, InsightGenerator};

use super::{load_dataset, print_json};

pub fn cmd_health(file: &Path, json: bool) -> Result<()> {
    let dataset = load_dataset(file)?;
    let calculator = HealthCalculator::new();
    let score = calculator.calculate_financial_health_score(
        &dataset.transactions,
        &dataset.budgets,
        &dataset.goals,
    );

    if json {
        return print_json(&score);
    }

    println!();
    println!("💚 Financial Health");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Overall:          {:.2}", score.overall_score);
    println!("   Spending:         {:.2}", score.spending_score);
    println!("   Savings:          {:.2}", score.savings_score);
    println!("   Budget adherence: {:.2}", score.budget_adherence_score);
    println!("   Debt:             {:.2}", score.debt_score);
    println!("   Factors:");
    for factor in &score.factors {
        println!("   - {}", factor);
    }
    println!("   Recommendations:");
    for recommendation in &score.recommendations {
        println!("   - {}", recommendation);
    }
    println!(
        "   Calculated: {}",
        score.calculated_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}

pub fn cmd_insights(file: &Path, user_id: i64, json: bool) -> Result<()> {
    let dataset = load_dataset(file)?;
    let generator = InsightGenerator::new();
    let insights = generator.generate_insights(
        user_id,
        &dataset.transactions,
        &dataset.budgets,
        &dataset.goals,
    );

    if json {
        return print_json(&insights);
    }

    println!();
    println!("💡 Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    if insights.is_empty() {
        println!("   No insights generated. Add more data and try again.");
        return Ok(());
    }
    for insight in &insights {
        println!(
            "   [{}] {}  (conf {:.2})",
            insight.insight_type.as_str(),
            insight.title,
            insight.confidence_score
        );
        println!("      {}", insight.description);
        for action in &insight.action_items {
            println!("      - {}", action);
        }
        println!();
    }
    Ok(())
}
