use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Explainer failed: {reason}")]
    Explainer { reason: String },

    #[error("No inventory source available (override absent and mock disabled)")]
    NoInventorySource,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type OracleResult<T> = Result<T, OracleError>;
