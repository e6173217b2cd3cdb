use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use super::transaction::{Transaction, DESCRIPTION_FIELD};

pub const WEEK_FIELD: &str = "Week";
pub const AMOUNT_FIELD: &str = "Amount";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One transaction as it appears inside a category group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendItem {
    #[serde(rename = "Description")]
    pub description: Value,
    #[serde(rename = "Amount")]
    pub amount: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorySpend {
    #[serde(rename = "Transactions")]
    pub transactions: Vec<SpendItem>,
    #[serde(rename = "Total")]
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekSpend {
    #[serde(rename = "Categories")]
    pub categories: BTreeMap<String, CategorySpend>,
    #[serde(rename = "TotalWeek")]
    pub total_week: f64,
}

/// Spending grouped by week, then by category.
///
/// Serializes as an object keyed `"Week: YYYY-MM-DD"`, newest week first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklySummary {
    weeks: BTreeMap<String, WeekSpend>,
}

impl WeeklySummary {
    /// Fold records into week/category groups. Records without a `Week` are
    /// skipped; a missing or blank `Category` groups under "Uncategorized".
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut weeks: BTreeMap<String, WeekSpend> = BTreeMap::new();

        for txn in transactions {
            let Some(week) = txn.get(WEEK_FIELD).and_then(week_key) else {
                tracing::debug!(%txn, "Skipping transaction without Week");
                continue;
            };
            let category = txn
                .category()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(UNCATEGORIZED);
            let amount = amount_of(txn.get(AMOUNT_FIELD));

            let week_spend = weeks.entry(week).or_default();
            let group = week_spend.categories.entry(category.to_string()).or_default();
            group.transactions.push(SpendItem {
                description: txn.get(DESCRIPTION_FIELD).cloned().unwrap_or(Value::Null),
                amount: txn.get(AMOUNT_FIELD).cloned().unwrap_or(Value::Null),
            });
            group.total += amount;
            week_spend.total_week += amount;
        }

        Self { weeks }
    }

    /// Weeks newest first.
    pub fn weeks(&self) -> impl Iterator<Item = (&str, &WeekSpend)> {
        self.weeks.iter().rev().map(|(k, v)| (k.as_str(), v))
    }

    pub fn week(&self, week: &str) -> Option<&WeekSpend> {
        self.weeks.get(week)
    }
}

impl Serialize for WeeklySummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.weeks.len()))?;
        for (week, spend) in self.weeks() {
            map.serialize_entry(&format!("Week: {week}"), spend)?;
        }
        map.end()
    }
}

/// `2024-05-06`, `2024-05-06T00:00:00Z` and `2024-05-06 00:00` all map to
/// `2024-05-06`. Anything that is not a date is used verbatim.
fn week_key(value: &Value) -> Option<String> {
    let raw = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if raw.is_empty() {
        return None;
    }

    let date_part = raw.get(..10).unwrap_or(raw.as_str());
    Some(
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or(raw),
    )
}

/// Numeric amounts count as-is; sheet cells like "1,204.50" are parsed.
/// Anything else contributes zero.
fn amount_of(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
