//! Data routes: GET /data and GET /count.

use crate::handlers::machine_status::{count_rows, list_rows};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn machine_status_routes(state: AppState) -> Router {
    Router::new()
        .route("/data", get(list_rows))
        .route("/count", get(count_rows))
        .with_state(state)
}
