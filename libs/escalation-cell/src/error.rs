use thiserror::Error;

#[derive(Debug, Error)]
pub enum EscalationError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for EscalationError {
    fn from(err: anyhow::Error) -> Self {
        EscalationError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for EscalationError {
    fn from(err: serde_json::Error) -> Self {
        EscalationError::Database(format!("Deserialization error: {}", err))
    }
}

impl From<sla_policy_cell::PolicyError> for EscalationError {
    fn from(err: sla_policy_cell::PolicyError) -> Self {
        EscalationError::Database(err.to_string())
    }
}
