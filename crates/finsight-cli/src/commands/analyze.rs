//! Pattern analysis and behavior classification commands

use std::path::Path;

use anyhow::Result;

use finsight_core::{BehaviorClassifier, SpendingPatternAnalyzer};

use super::{load_dataset, print_json};

pub fn cmd_patterns(file: &Path, json: bool) -> Result<()> {
    let dataset = load_dataset(file)?;
    let analyzer = SpendingPatternAnalyzer::new();
    let report = analyzer.analyze_spending_patterns(&dataset.transactions);

    if json {
        return print_json(&report);
    }

    println!();
    println!("📊 Spending Patterns");
    println!("   Transactions analyzed: {}", dataset.transactions.len());
    println!("   ─────────────────────────────────────────────────────────────");

    if dataset.transactions.is_empty() {
        println!("   No transactions to analyze.");
        return Ok(());
    }

    let categories = &report.patterns.category_patterns;
    if !categories.top_categories.is_empty() {
        println!("   Top categories:");
        let mut ranked: Vec<(&String, f64)> = categories
            .top_categories
            .iter()
            .map(|(category, &total)| (category, total))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (category, total) in ranked {
            println!("     {:<20} ${:>10.2}", category, total);
        }
    }

    let temporal = &report.patterns.temporal_patterns;
    if let Some(day) = &temporal.peak_spending_day {
        println!("   Peak spending day:  {}", day);
    }
    if let Some(hour) = temporal.peak_spending_hour {
        println!("   Peak spending hour: {:02}:00", hour);
    }

    let tiers = &report.patterns.amount_patterns.spending_tiers;
    println!(
        "   Spending tiers: {} small / {} medium / {} large",
        tiers.small.count, tiers.medium.count, tiers.large.count
    );

    let clusters = &report.patterns.behavioral_clusters;
    match &clusters.note {
        Some(note) => println!("   Clusters: {}", note),
        None => println!("   Clusters: {} behavioral groups", clusters.total_clusters),
    }

    if !report.insights.is_empty() {
        println!();
        println!("   Insights:");
        for insight in &report.insights {
            println!("   - {}", insight);
        }
    }
    Ok(())
}

pub fn cmd_behavior(file: &Path, json: bool) -> Result<()> {
    let dataset = load_dataset(file)?;
    let classifier = BehaviorClassifier::new();
    let report =
        classifier.classify_spending_behavior(&dataset.transactions, Some(&dataset.budgets));

    if json {
        return print_json(&report);
    }

    println!();
    println!("🧠 Spending Behavior");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Type: {}", report.behavior_type.as_str());
    println!("   Consistency:      {:.2}", report.metrics.consistency);
    println!("   Impulse ratio:    {:.2}", report.metrics.impulse_ratio);
    println!("   Planning score:   {:.2}", report.metrics.planning_score);
    println!("   Budget adherence: {:.2}", report.metrics.budget_adherence);
    println!("   Recommendations:");
    for recommendation in &report.recommendations {
        println!("   - {}", recommendation);
    }
    Ok(())
}
