use thiserror::Error;

use crate::models::AlertStatus;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Alert not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Alert cannot be modified in current status: {0}")]
    InvalidState(AlertStatus),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AlertError {
    fn from(err: anyhow::Error) -> Self {
        AlertError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AlertError {
    fn from(err: serde_json::Error) -> Self {
        AlertError::Database(err.to_string())
    }
}

impl From<sla_policy_cell::PolicyError> for AlertError {
    fn from(err: sla_policy_cell::PolicyError) -> Self {
        AlertError::Database(err.to_string())
    }
}
