use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Policy not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for PolicyError {
    fn from(err: anyhow::Error) -> Self {
        PolicyError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::Database(err.to_string())
    }
}
