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

use crate::error::PolicyError;
use crate::models::{CreatePolicyRequest, PolicyListQuery, UpdatePolicyRequest};
use crate::services::policy::PolicyService;

fn map_err(err: PolicyError) -> AppError {
    match err {
        PolicyError::NotFound(msg) => AppError::NotFound(msg),
        PolicyError::Validation(msg) => AppError::ValidationError(msg),
        PolicyError::Database(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_policies(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<PolicyListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = PolicyService::new(&config);

    let policies = service
        .list_policies(query, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!({
        "policies": policies,
        "total": policies.len()
    })))
}

#[axum::debug_handler]
pub async fn create_policy(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreatePolicyRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PolicyService::new(&config);

    let policy = service
        .create_policy(request, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!(policy)))
}

#[axum::debug_handler]
pub async fn update_policy(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(policy_id): Path<Uuid>,
    Json(request): Json<UpdatePolicyRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PolicyService::new(&config);

    let policy = service
        .update_policy(policy_id, request, Some(auth.token()))
        .await
        .map_err(map_err)?;

    Ok(Json(json!(policy)))
}
