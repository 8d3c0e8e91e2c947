use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_alert_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_alerts))
        .route("/intake", post(record_vitals))
        .route("/{id}", get(get_alert))
        .route("/{id}/logs", get(get_alert_logs))
        .route("/{id}/sla", get(get_alert_sla))
        .route("/{id}/acknowledge", post(acknowledge_alert))
        .route("/{id}/resolve", post(resolve_alert))
        .with_state(config)
}
