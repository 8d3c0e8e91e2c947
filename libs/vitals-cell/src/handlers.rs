use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{RecordVitalsRequest, VitalReading};
use crate::services::evaluator::evaluate_reading;

/// Dry-run classification: no persistence, no alert. Lets the intake UI
/// preview severity before committing a reading.
#[axum::debug_handler]
pub async fn evaluate_vitals(
    State(_config): State<Arc<AppConfig>>,
    Json(request): Json<RecordVitalsRequest>,
) -> Result<Json<Value>, AppError> {
    let reading = VitalReading {
        id: Uuid::nil(),
        patient_id: request.patient_id,
        visit_id: request.visit_id,
        heart_rate: request.heart_rate,
        blood_pressure_systolic: request.blood_pressure_systolic,
        blood_pressure_diastolic: request.blood_pressure_diastolic,
        temperature: request.temperature,
        respiratory_rate: request.respiratory_rate,
        spo2: request.spo2,
        recorded_by: request.recorded_by,
        recorded_at: chrono::Utc::now(),
    };

    let classification = evaluate_reading(&reading);
    let worst = classification.worst();
    let has_critical = classification.has_critical();

    Ok(Json(json!({
        "classification": classification,
        "worst": worst,
        "has_critical": has_critical,
    })))
}
