use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_vitals_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_vitals))
        .with_state(config)
}
