pub mod api;
pub mod categorizer;
pub mod config;
pub mod db;
pub mod errors;
pub mod huggingface;
pub mod metrics;
pub mod models;
pub mod services;
pub mod sheets;

use std::sync::Arc;

use crate::categorizer::{BatchScheduler, Classifier};
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::sheets::SheetsClient;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    pub classifier: Option<Arc<dyn Classifier>>,
    pub sheets: Option<SheetsClient>,
}

impl AppState {
    /// A scheduler for one request. Every call starts with fresh telemetry.
    pub fn scheduler(&self) -> Result<BatchScheduler<Arc<dyn Classifier>>, AppError> {
        let classifier = self
            .classifier
            .clone()
            .ok_or_else(|| AppError::BadRequest("classifier is not configured (HF_API_TOKEN)".into()))?;

        Ok(BatchScheduler::new(classifier, self.config.scheduler_config()))
    }
}
