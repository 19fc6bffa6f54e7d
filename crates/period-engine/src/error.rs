//! Error types for period-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid view mode: {0}")]
    InvalidViewMode(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unresolvable period: {0}")]
    Unresolvable(String),
}

pub type Result<T> = std::result::Result<T, PeriodError>;
