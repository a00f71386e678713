//! Input records for the analytics engines
//!
//! These are the shapes the orchestration layer hands us after fetching a
//! user's financial data. All engines take slices of these and return plain
//! report values; nothing here is persisted by this crate.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// A single financial transaction
///
/// `amount` is signed: the cash-flow predictor treats positive as income and
/// negative as expense, while the anomaly/pattern/budget engines read the
/// value as a spend magnitude. Malformed amounts arrive as non-finite floats
/// and are excluded from statistics rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Upstream identifier, if the source system has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub amount: f64,
    pub category: String,
    #[serde(deserialize_with = "de_datetime")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    /// Weekday index with Monday = 0
    pub fn weekday_index(&self) -> u32 {
        self.date.weekday().num_days_from_monday()
    }

    /// Saturday or Sunday
    pub fn is_weekend(&self) -> bool {
        self.weekday_index() >= 5
    }

    /// Amount is usable for statistics
    pub fn has_finite_amount(&self) -> bool {
        self.amount.is_finite()
    }
}

/// A monthly spending limit for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    pub amount: f64,
}

/// A savings goal
///
/// Upstream exports these with camelCase keys; the aliases accept both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    #[serde(alias = "targetAmount")]
    pub target_amount: f64,
    #[serde(default, alias = "currentAmount")]
    pub current_amount: f64,
    #[serde(
        default,
        alias = "targetDate",
        deserialize_with = "de_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_date: Option<DateTime<Utc>>,
}

/// Parse a timestamp from the formats upstream exports actually contain
///
/// Accepts RFC 3339 ("2024-03-01T18:30:00Z"), naive datetimes with or without
/// fractional seconds, bare ISO dates (interpreted as midnight UTC), and
/// US-style MM/DD/YYYY dates.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc());
        }
    }

    Err(Error::InvalidData(format!("unrecognized date: {}", s)))
}

fn de_datetime<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_datetime(&s).map_err(serde::de::Error::custom)
}

fn de_datetime_opt<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => {
            parse_datetime(&s).map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}
