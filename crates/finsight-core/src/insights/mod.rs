//! Insight generation
//!
//! Turns the raw analytics output into short, human-readable observations
//! with suggested actions. Four independent passes feed one list:
//!
//! - **Pattern insights** - top category, rising categories, peak spending day
//! - **Budget insights** - current-month over/under budget callouts
//! - **Goal insights** - progress nudges for goals with a deadline
//! - **Savings insights** - impulse-spending and subscription review prompts

pub mod generator;
pub mod types;

pub use generator::InsightGenerator;
pub use types::{Insight, InsightType};
