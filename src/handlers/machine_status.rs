//! Read-only handlers over `machine_status`.

use crate::error::AppError;
use crate::response::{count_ok, rows_ok};
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

/// GET /data — every row, ascending `id`.
pub async fn list_rows(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.list_all().await?;
    tracing::debug!(rows = rows.len(), "listed machine_status");
    Ok(rows_ok(rows))
}

/// GET /count — `[{"count": n}]`.
pub async fn count_rows(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let count = state.store.count().await?;
    Ok(count_ok(count))
}
