//! Loading analysis input from JSON and CSV files
//!
//! Parsing is tolerant at the record level: a record that fails to parse is
//! skipped with a warning so one bad row never sinks a whole import.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{parse_datetime, Budget, Goal, Transaction};

/// In-memory input for one analysis run
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
}

impl Dataset {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Accepts either a bare transaction array or an object with
    /// `transactions`, `budgets` and `goals` arrays
    pub fn from_json_str(data: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(data)?;
        match value {
            Value::Array(items) => Ok(Self {
                transactions: collect_records(items, "transaction"),
                budgets: Vec::new(),
                goals: Vec::new(),
            }),
            Value::Object(mut map) => {
                let transactions = take_array(&mut map, "transactions");
                let budgets = take_array(&mut map, "budgets");
                let goals = take_array(&mut map, "goals");
                Ok(Self {
                    transactions: collect_records(transactions, "transaction"),
                    budgets: collect_records(budgets, "budget"),
                    goals: collect_records(goals, "goal"),
                })
            }
            _ => Err(Error::InvalidData(
                "expected a JSON array or object".to_string(),
            )),
        }
    }
}

fn take_array(map: &mut serde_json::Map<String, Value>, key: &str) -> Vec<Value> {
    match map.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn collect_records<T: serde::de::DeserializeOwned>(items: Vec<Value>, kind: &str) -> Vec<T> {
    let mut records = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(kind, index, error = %e, "skipping unparseable record");
            }
        }
    }
    records
}

/// Read transactions from a CSV file
///
/// Requires `amount`, `category` and `date` columns (matched by header name,
/// case-insensitive); `id`, `merchant` and `description` are optional.
pub fn read_transactions_csv(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    read_transactions_csv_reader(file)
}

pub fn read_transactions_csv_reader<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut transactions = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(row = index + 1, error = %e, "skipping unreadable csv row");
                continue;
            }
        };
        match columns.parse_row(&record) {
            Ok(tx) => transactions.push(tx),
            Err(e) => {
                tracing::warn!(row = index + 1, error = %e, "skipping invalid csv row");
            }
        }
    }

    tracing::debug!(count = transactions.len(), "csv transactions loaded");
    Ok(transactions)
}

struct ColumnMap {
    amount: usize,
    category: usize,
    date: usize,
    id: Option<usize>,
    merchant: Option<usize>,
    description: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| Error::InvalidData(format!("missing {} column", name)))
        };
        Ok(Self {
            amount: required("amount")?,
            category: required("category")?,
            date: required("date")?,
            id: find("id"),
            merchant: find("merchant"),
            description: find("description"),
        })
    }

    fn parse_row(&self, record: &StringRecord) -> Result<Transaction> {
        let amount = field(record, self.amount, "amount")?
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidData("unparseable amount".to_string()))?;
        let category = field(record, self.category, "category")?.trim().to_string();
        let date = parse_datetime(field(record, self.date, "date")?.trim())?;

        let id = match self.id.and_then(|index| record.get(index)) {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| Error::InvalidData("unparseable id".to_string()))?,
            ),
            _ => None,
        };
        let optional = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Ok(Transaction {
            id,
            amount,
            category,
            date,
            merchant: optional(self.merchant),
            description: optional(self.description),
        })
    }
}

fn field<'a>(record: &'a StringRecord, index: usize, name: &str) -> Result<&'a str> {
    record
        .get(index)
        .ok_or_else(|| Error::InvalidData(format!("missing {} field", name)))
}
