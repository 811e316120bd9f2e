use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid start day '{0}', expected MM-DD")]
    InvalidStartDay(String),
    #[error("invalid time index '{0}', expected a year or YYYY-MM-DD")]
    InvalidTimeIndex(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
