use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers::run_sweep;
use crate::services::monitor::EscalationMonitor;

pub fn create_escalation_router(monitor: Arc<EscalationMonitor>) -> Router {
    Router::new()
        .route("/sweep", post(run_sweep))
        .with_state(monitor)
}
