//! Core types for generated insights

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Types of insights that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Observations about where and when money goes
    SpendingPattern,
    /// A concrete chance to spend less
    SavingOpportunity,
    /// Budget limit exceeded or close to it
    BudgetAlert,
    /// Overall financial health commentary
    FinancialHealth,
    /// Progress toward a savings goal
    GoalProgress,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::SpendingPattern => "spending_pattern",
            InsightType::SavingOpportunity => "saving_opportunity",
            InsightType::BudgetAlert => "budget_alert",
            InsightType::FinancialHealth => "financial_health",
            InsightType::GoalProgress => "goal_progress",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending_pattern" => Ok(InsightType::SpendingPattern),
            "saving_opportunity" => Ok(InsightType::SavingOpportunity),
            "budget_alert" => Ok(InsightType::BudgetAlert),
            "financial_health" => Ok(InsightType::FinancialHealth),
            "goal_progress" => Ok(InsightType::GoalProgress),
            _ => Err(Error::InvalidData(format!("unknown insight type: {}", s))),
        }
    }
}

/// One generated observation with suggested follow-up actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub user_id: i64,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub confidence_score: f64,
    pub action_items: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Insight {
    pub fn new(
        user_id: i64,
        insight_type: InsightType,
        title: impl Into<String>,
        description: impl Into<String>,
        confidence_score: f64,
    ) -> Self {
        Self {
            user_id,
            insight_type,
            title: title.into(),
            description: description.into(),
            confidence_score: confidence_score.clamp(0.0, 1.0),
            action_items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<String>) -> Self {
        self.action_items = actions;
        self
    }
}
