use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_scorecard_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/doctors/{id}", get(get_doctor_scorecard))
        .route("/hospitals/{id}", get(get_hospital_scorecard))
        .with_state(config)
}
