use chrono::NaiveDate;
use thiserror::Error;

use crate::types::EmployeeId;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("validation failed for employee {employee_id} on {date}: {reason}")]
    Validation {
        date:        NaiveDate,
        employee_id: EmployeeId,
        reason:      String,
    },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
