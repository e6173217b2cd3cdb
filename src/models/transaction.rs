use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DESCRIPTION_FIELD: &str = "Description";
pub const TRANSACTION_ID_FIELD: &str = "Transaction ID";
pub const CATEGORY_FIELD: &str = "Category";

/// One financial event as an ordered bag of named fields.
///
/// The categorizer only ever reads `Description` and `Transaction ID` and
/// writes `Category`; every other field is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(Map<String, Value>);

impl Transaction {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Text submitted to the classifier. Missing or null → empty string.
    pub fn description(&self) -> String {
        field_as_string(self.0.get(DESCRIPTION_FIELD)).unwrap_or_default()
    }

    /// Unique identifier used for persistence dedup.
    pub fn transaction_id(&self) -> Option<String> {
        field_as_string(self.0.get(TRANSACTION_ID_FIELD)).filter(|id| !id.is_empty())
    }

    pub fn category(&self) -> Option<&str> {
        self.0.get(CATEGORY_FIELD).and_then(Value::as_str)
    }

    /// Only a non-blank string label counts; blank cells and non-string
    /// values are uncategorized.
    pub fn is_categorized(&self) -> bool {
        self.category().is_some_and(|c| !c.trim().is_empty())
    }

    pub fn set_category(&mut self, label: impl Into<String>) {
        self.0
            .insert(CATEGORY_FIELD.to_string(), Value::String(label.into()));
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl AsRef<Transaction> for Transaction {
    fn as_ref(&self) -> &Transaction {
        self
    }
}

impl AsMut<Transaction> for Transaction {
    fn as_mut(&mut self) -> &mut Transaction {
        self
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.transaction_id().unwrap_or_else(|| "-".into());
        let desc = self.description();
        write!(
            f,
            "Transaction: id={} desc={}",
            id,
            &desc[..desc.char_indices().nth(32).map_or(desc.len(), |(i, _)| i)],
        )
    }
}

/// Parse a raw JSON payload into transaction records.
///
/// The payload must be a JSON array of objects; anything else is rejected
/// up front since retrying an unparsable payload can never succeed.
pub fn parse_transactions(payload: &str) -> Result<Vec<Transaction>, serde_json::Error> {
    serde_json::from_str(payload)
}

fn field_as_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
