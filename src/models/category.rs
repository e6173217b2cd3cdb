use serde::{Deserialize, Serialize};

/// Labels offered to the zero-shot classifier when none are configured.
pub const DEFAULT_CATEGORY_LABELS: &[&str] = &[
    "Grocery",
    "Snacks",
    "Takeouts",
    "Entertainment",
    "Transportation",
    "Credit Card Payment",
    "Shopping",
    "Personal Care",
    "Healthcare",
];

/// Fixed, caller-supplied enumeration of classification labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabels(Vec<String>);

impl Default for CategoryLabels {
    fn default() -> Self {
        Self(DEFAULT_CATEGORY_LABELS.iter().map(|s| s.to_string()).collect())
    }
}

impl CategoryLabels {
    /// Parse a comma-separated list, falling back to the defaults when empty.
    pub fn from_csv(raw: &str) -> Self {
        let labels: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if labels.is_empty() {
            Self::default()
        } else {
            Self(labels)
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
