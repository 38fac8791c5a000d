//! Error types for wallclock-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WallclockError {
    #[error("Invalid time of day: {0}")]
    TimeParse(String),

    #[error("Invalid calendar date: {0}")]
    DateParse(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, WallclockError>;
