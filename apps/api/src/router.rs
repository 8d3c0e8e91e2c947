use std::sync::Arc;

use axum::{routing::get, Router};

use alert_cell::create_alert_router;
use escalation_cell::{create_escalation_router, EscalationMonitor};
use scorecard_cell::create_scorecard_router;
use shared_config::AppConfig;
use sla_policy_cell::create_policy_router;
use vitals_cell::create_vitals_router;

pub fn create_router(state: Arc<AppConfig>, monitor: Arc<EscalationMonitor>) -> Router {
    Router::new()
        .route("/", get(|| async { "Vital SLA API is running!" }))
        .nest("/vitals", create_vitals_router(state.clone()))
        .nest("/alerts", create_alert_router(state.clone()))
        .nest("/policies", create_policy_router(state.clone()))
        .nest("/escalations", create_escalation_router(monitor))
        .nest("/scorecards", create_scorecard_router(state))
}
