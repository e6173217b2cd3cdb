use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::models::{parse_transactions, Transaction};
use crate::AppState;

/// Categorize a raw JSON array of transactions.
///
/// The body is parsed by hand so a malformed payload is reported as a
/// 400 before any classifier call is made.
pub async fn categorize(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = parse_transactions(&body)?;
    let scheduler = state.scheduler()?;

    tracing::info!(count = transactions.len(), "Categorize request received");

    let outcome = scheduler.run(transactions).await;

    if !outcome.unclassified.is_empty() {
        tracing::warn!(
            unclassified = outcome.unclassified.len(),
            rounds = outcome.report.rounds,
            "Returning without transactions the classifier never accepted"
        );
    }

    Ok(Json(outcome.processed))
}
