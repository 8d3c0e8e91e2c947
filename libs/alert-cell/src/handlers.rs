use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use vitals_cell::models::RecordVitalsRequest;

use crate::error::AlertError;
use crate::models::{AcknowledgeRequest, AlertListQuery, ResolveRequest};
use crate::services::alerts::AlertService;
use crate::services::logs::AlertLogService;

fn map_err(err: AlertError) -> AppError {
    match err {
        AlertError::NotFound(msg) => AppError::NotFound(msg),
        AlertError::Validation(msg) => AppError::ValidationError(msg),
        AlertError::InvalidState(status) => {
            AppError::InvalidState(format!("alert is {}", status))
        }
        AlertError::Database(msg) => AppError::Database(msg),
    }
}

/// Record a reading and open an alert when anything classifies critical.
#[axum::debug_handler]
pub async fn record_vitals(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<RecordVitalsRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AlertService::new(&config);

    let response = service
        .record_vitals(request, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!(response)))
}

#[axum::debug_handler]
pub async fn list_alerts(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<AlertListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AlertService::new(&config);

    let alerts = service
        .list_alerts(query, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!({
        "alerts": alerts,
        "total": alerts.len()
    })))
}

#[axum::debug_handler]
pub async fn get_alert(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AlertService::new(&config);

    let alert = service
        .get_alert(alert_id, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!(alert)))
}

#[axum::debug_handler]
pub async fn get_alert_logs(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AlertLogService::new(&config);

    let logs = service
        .list_for_alert(alert_id, Some(auth.token()))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "logs": logs,
        "total": logs.len()
    })))
}

#[axum::debug_handler]
pub async fn get_alert_sla(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AlertService::new(&config);

    let sla = service
        .sla_state(alert_id, chrono::Utc::now(), Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!(sla)))
}

#[axum::debug_handler]
pub async fn acknowledge_alert(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(alert_id): Path<Uuid>,
    Json(request): Json<AcknowledgeRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AlertService::new(&config);

    let alert = service
        .acknowledge(alert_id, request.user_id, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!(alert)))
}

#[axum::debug_handler]
pub async fn resolve_alert(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(alert_id): Path<Uuid>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AlertService::new(&config);

    let alert = service
        .resolve(alert_id, request.user_id, &request.notes, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!(alert)))
}
