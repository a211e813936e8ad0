use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("`{kind}` descriptor is missing required field `{field}`")]
    MissingField { kind: String, field: &'static str },

    #[error("`{kind}` descriptor has invalid `{field}`: {reason}")]
    InvalidField { kind: String, field: &'static str, reason: String },
}

pub type FleetResult<T> = Result<T, FleetError>;
