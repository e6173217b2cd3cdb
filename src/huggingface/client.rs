use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::types::{ZeroShotRequest, ZeroShotResponse};
use crate::categorizer::Classifier;
use crate::models::CategoryLabels;

pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-mnli";

/// Fallback wait when a loading model does not report `estimated_time`.
const DEFAULT_LOADING_WAIT_SECS: f64 = 10.0;

#[derive(Debug, Error)]
pub enum ZeroShotError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("model is still loading (estimated {estimated_secs:.1}s)")]
    ModelLoading { estimated_secs: f64 },

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Zero-shot text classification against the Hugging Face inference API.
#[derive(Debug, Clone)]
pub struct ZeroShotClient {
    http: Client,
    model_url: String,
    api_token: String,
    /// Upper bound on a single cold-start wait.
    max_loading_wait: Duration,
}

impl ZeroShotClient {
    pub fn new(http: Client, api_token: String) -> Self {
        Self {
            http,
            model_url: DEFAULT_MODEL_URL.into(),
            api_token,
            max_loading_wait: Duration::from_secs(60),
        }
    }

    pub fn with_model_url(mut self, model_url: impl Into<String>) -> Self {
        self.model_url = model_url.into();
        self
    }

    pub fn with_max_loading_wait(mut self, max_loading_wait: Duration) -> Self {
        self.max_loading_wait = max_loading_wait;
        self
    }

    /// Rank `labels` for `description`, waiting out one cold start if the
    /// model reports that it is loading.
    pub async fn top_label(
        &self,
        description: &str,
        labels: &CategoryLabels,
    ) -> Result<String, ZeroShotError> {
        match self.request(description, labels).await {
            Err(ZeroShotError::ModelLoading { estimated_secs }) => {
                let wait = Duration::from_secs_f64(
                    estimated_secs
                        .max(0.0)
                        .min(self.max_loading_wait.as_secs_f64()),
                );
                tracing::info!(
                    wait_secs = wait.as_secs_f64(),
                    "Classifier model loading, waiting before retry"
                );
                tokio::time::sleep(wait).await;
                self.request(description, labels).await
            }
            other => other,
        }
    }

    async fn request(
        &self,
        description: &str,
        labels: &CategoryLabels,
    ) -> Result<String, ZeroShotError> {
        let resp = self
            .http
            .post(&self.model_url)
            .bearer_auth(&self.api_token)
            .json(&ZeroShotRequest::new(description, labels.as_slice()))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let parsed: Option<ZeroShotResponse> = serde_json::from_str(&body).ok();

        if let Some(reply) = parsed.as_ref().filter(|r| r.is_model_loading()) {
            return Err(ZeroShotError::ModelLoading {
                estimated_secs: reply.estimated_time.unwrap_or(DEFAULT_LOADING_WAIT_SECS),
            });
        }

        if !status.is_success() {
            return Err(ZeroShotError::Status { status, body });
        }

        parsed
            .as_ref()
            .and_then(ZeroShotResponse::top_label)
            .map(str::to_string)
            .ok_or_else(|| ZeroShotError::Unexpected(body))
    }
}

#[async_trait]
impl Classifier for ZeroShotClient {
    async fn classify(&self, description: &str, labels: &CategoryLabels) -> anyhow::Result<String> {
        Ok(self.top_label(description, labels).await?)
    }
}
