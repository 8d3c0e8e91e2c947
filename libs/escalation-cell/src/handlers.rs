use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::error::EscalationError;
use crate::models::SweepOutcome;
use crate::services::monitor::EscalationMonitor;

fn map_err(err: EscalationError) -> AppError {
    match err {
        EscalationError::Database(msg) => AppError::Database(msg),
    }
}

/// Run one escalation sweep on demand. The interval task uses the same
/// monitor, so a manual sweep that collides with a tick reports skipped.
#[axum::debug_handler]
pub async fn run_sweep(
    State(monitor): State<Arc<EscalationMonitor>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let outcome = monitor.sweep(Some(auth.token())).await.map_err(map_err)?;

    match outcome {
        SweepOutcome::Completed(report) => Ok(Json(json!(report))),
        SweepOutcome::Skipped => Ok(Json(json!({ "skipped": true }))),
    }
}
