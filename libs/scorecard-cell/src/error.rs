use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScorecardError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for ScorecardError {
    fn from(err: anyhow::Error) -> Self {
        ScorecardError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for ScorecardError {
    fn from(err: serde_json::Error) -> Self {
        ScorecardError::Database(format!("Deserialization error: {}", err))
    }
}

impl From<sla_policy_cell::PolicyError> for ScorecardError {
    fn from(err: sla_policy_cell::PolicyError) -> Self {
        ScorecardError::Database(err.to_string())
    }
}
