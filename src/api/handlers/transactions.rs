use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::transaction_repo;
use crate::errors::AppError;
use crate::models::{parse_transactions, Transaction, WeeklySummary};
use crate::AppState;

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 1_000;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct WriteResponse {
    pub success: bool,
    pub written: u64,
    pub data: Vec<Transaction>,
}

/// Return only the transactions that are not stored yet.
pub async fn filter_new(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = parse_transactions(&body)?;
    let fresh = transaction_repo::filter_new(&state.db, transactions).await?;
    Ok(Json(fresh))
}

/// Upsert transactions by id and echo them back.
pub async fn write(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<WriteResponse>, AppError> {
    let transactions = parse_transactions(&body)?;
    let written = transaction_repo::upsert_transactions(&state.db, &transactions).await?;

    tracing::info!(received = transactions.len(), written, "Transactions written");

    Ok(Json(WriteResponse {
        success: true,
        written,
        data: transactions,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ApiResponse<Vec<Value>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    match transaction_repo::list_transactions(&state.db, limit).await {
        Ok(rows) => Json(ApiResponse {
            success: true,
            data: Some(rows.into_iter().map(|r| r.document.0).collect()),
            error: None,
        }),
        Err(e) => Json(ApiResponse {
            success: false,
            data: None,
            error: Some(e.to_string()),
        }),
    }
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    transaction_repo::get_transaction(&state.db, &id)
        .await?
        .map(|row| Json(row.document.0))
        .ok_or_else(|| AppError::NotFound(format!("transaction {id}")))
}

/// Spending per week and category, newest week first.
pub async fn summary(State(state): State<AppState>) -> Result<Json<WeeklySummary>, AppError> {
    let summary = transaction_repo::weekly_summary(&state.db).await?;
    Ok(Json(summary))
}
