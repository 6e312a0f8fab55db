use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidClock(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Unknown period '{0}', expected day, week, month or all")]
    UnknownPeriod(String),
    #[error("Unknown view '{0}', expected daily, weekly or monthly")]
    UnknownView(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::bad_request(err.to_string())
    }
}
