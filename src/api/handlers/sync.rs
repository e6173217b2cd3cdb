use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::services::{run_sheet_sync, SyncSummary};
use crate::AppState;

pub async fn sync_sheet(State(state): State<AppState>) -> Result<Json<SyncSummary>, AppError> {
    let sheets = state
        .sheets
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("spreadsheet source is not configured".into()))?;
    let scheduler = state.scheduler()?;

    let summary = run_sheet_sync(&state.db, sheets, &scheduler).await?;
    Ok(Json(summary))
}
