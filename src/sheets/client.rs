use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::Transaction;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Debug, Error)]
pub enum SheetsClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// `values.get` reply. `values` is absent when the range is empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<Vec<Value>>>,
}

impl ValueRange {
    /// Turn rows into records keyed by the header row.
    ///
    /// The API trims trailing empty cells, so short rows are padded with "".
    pub fn into_transactions(self) -> Vec<Transaction> {
        let mut rows = self.values.unwrap_or_default().into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(h) => h.into_iter().map(cell_to_string).collect(),
            None => return Vec::new(),
        };

        rows.map(|row| {
            let mut cells = row.into_iter();
            let mut fields = Map::with_capacity(headers.len());
            for header in &headers {
                let cell = cells.next().unwrap_or_else(|| Value::String(String::new()));
                fields.insert(header.clone(), cell);
            }
            Transaction::new(fields)
        })
        .collect()
    }
}

/// Read-only client for a transactions worksheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    base_url: String,
    api_key: String,
    spreadsheet_id: String,
    range: String,
}

impl SheetsClient {
    pub fn new(http: Client, api_key: String, spreadsheet_id: String, range: String) -> Self {
        Self {
            http,
            base_url: SHEETS_API_BASE.into(),
            api_key,
            spreadsheet_id,
            range,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the configured range as transaction records.
    pub async fn fetch_transactions(&self) -> Result<Vec<Transaction>, SheetsClientError> {
        let resp = self
            .http
            .get(self.values_url()?)
            .query(&[("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?;

        let body = resp.text().await?;
        let range: ValueRange = serde_json::from_str(&body)
            .map_err(|e| SheetsClientError::Unexpected(format!("{e}: {body}")))?;

        if range.values.is_none() {
            tracing::info!(range = %self.range, "No data found in spreadsheet range");
        }

        Ok(range.into_transactions())
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}` with each segment percent-encoded.
    fn values_url(&self) -> Result<Url, SheetsClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SheetsClientError::Unexpected(format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SheetsClientError::Unexpected(format!("invalid base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                self.range.as_str(),
            ]);
        Ok(url)
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn range(value: Value) -> ValueRange {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_rows_keyed_by_header() {
        let txns = range(json!({
            "range": "Transactions!A1:C3",
            "values": [
                ["Transaction ID", "Description", "Amount"],
                ["1", "Costco", "84.10"],
                ["2", "Lyft", "12.00"]
            ]
        }))
        .into_transactions();

        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].transaction_id().as_deref(), Some("1"));
        assert_eq!(txns[1].description(), "Lyft");
        assert_eq!(txns[1].get("Amount"), Some(&json!("12.00")));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let txns = range(json!({
            "values": [["Transaction ID", "Description", "Category"], ["7", "Netflix"]]
        }))
        .into_transactions();

        assert_eq!(txns[0].get("Category"), Some(&json!("")));
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = SheetsClient::new(
            Client::new(),
            "key".into(),
            "sheet123".into(),
            "May #2?".into(),
        )
        .with_base_url("http://localhost:9000/");

        assert_eq!(
            client.values_url().unwrap().as_str(),
            "http://localhost:9000/v4/spreadsheets/sheet123/values/May%20%232%3F"
        );
    }

    #[test]
    fn test_missing_values_is_empty() {
        assert!(range(json!({ "range": "Transactions" })).into_transactions().is_empty());
        assert!(range(json!({ "values": [["Only", "Headers"]] })).into_transactions().is_empty());
    }
}
