use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::error::ScorecardError;
use crate::services::scorecard::ScorecardService;

fn map_err(err: ScorecardError) -> AppError {
    match err {
        ScorecardError::NotFound(msg) => AppError::NotFound(msg),
        ScorecardError::Database(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn get_doctor_scorecard(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScorecardService::new(&config);

    let scorecard = service
        .doctor_scorecard(doctor_id, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!(scorecard)))
}

#[axum::debug_handler]
pub async fn get_hospital_scorecard(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(hospital_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScorecardService::new(&config);

    let scorecard = service
        .hospital_scorecard(hospital_id, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!(scorecard)))
}
