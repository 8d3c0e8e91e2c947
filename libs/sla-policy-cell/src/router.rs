use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_policy_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_policies))
        .route("/", post(create_policy))
        .route("/{id}", put(update_policy))
        .with_state(config)
}
