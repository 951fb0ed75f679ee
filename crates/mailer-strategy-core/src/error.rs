use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("unknown industry code: {0}")]
    UnknownIndustry(String),

    #[error("unknown target audience code: {0}")]
    UnknownAudience(String),

    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}
