use serde::{Deserialize, Serialize};

/// Request body for a zero-shot classification call.
#[derive(Debug, Clone, Serialize)]
pub struct ZeroShotRequest<'a> {
    pub inputs: &'a str,
    pub parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZeroShotParameters<'a> {
    pub candidate_labels: &'a [String],
}

impl<'a> ZeroShotRequest<'a> {
    pub fn new(inputs: &'a str, candidate_labels: &'a [String]) -> Self {
        Self {
            inputs,
            parameters: ZeroShotParameters { candidate_labels },
        }
    }
}

/// Inference API reply. The same shape carries a ranked result, an error
/// payload, or a cold-start notice, so every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZeroShotResponse {
    #[serde(default)]
    pub sequence: Option<String>,
    /// Labels ranked best-first.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub scores: Option<Vec<f64>>,
    #[serde(default)]
    pub error: Option<String>,
    /// Seconds until a loading model is expected to be ready.
    #[serde(default)]
    pub estimated_time: Option<f64>,
}

impl ZeroShotResponse {
    /// Highest-ranked label, if the reply is a complete ranking.
    pub fn top_label(&self) -> Option<&str> {
        self.scores.as_ref()?;
        self.labels.as_ref()?.first().map(String::as_str)
    }

    pub fn is_model_loading(&self) -> bool {
        self.error
            .as_deref()
            .is_some_and(|e| e.contains("currently loading"))
    }
}
