use dd_fleet::FleetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("no factory recognizes entity type `{kind}` (name `{name}`)")]
    UnrecognizedEntity { kind: String, name: String },

    #[error("entity construction failed: {0}")]
    Fleet(#[from] FleetError),

    #[error("malformed entity descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
