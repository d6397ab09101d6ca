//! Error taxonomy of the accounting engine.
//! Every variant's message doubles as the rejection reason shown to the user.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::model::LeaveStatus;

/// Malformed input. Nothing is written when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("To date {to} cannot be before from date {from}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("End time {} must be after start time {}", .end.format("%H:%M"), .start.format("%H:%M"))]
    EndNotAfterStart { start: NaiveTime, end: NaiveTime },

    #[error("Invalid month {0}, expected 1-12")]
    InvalidMonth(u32),

    #[error("Invalid year {0}")]
    InvalidYear(i32),

    #[error("Leave may cover at most {max} days, got {days}")]
    LeaveTooLong { days: i64, max: i64 },

    #[error("Invalid leave dates '{0}'")]
    InvalidLeaveDates(String),
}

/// Well-formed input that the current state does not allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    #[error("You already applied leave for these date(s): {}", join_dates(.dates))]
    LeaveOverlap { dates: Vec<NaiveDate> },

    #[error("You are on approved leave on {date}. Activity not allowed")]
    OnApprovedLeave { date: NaiveDate },

    #[error("You cannot submit activity for a future date ({date})")]
    FutureDate { date: NaiveDate },

    #[error(
        "Activity start or end time cannot be in the future ({}-{})",
        .start.format("%H:%M"),
        .end.format("%H:%M")
    )]
    FutureTime { start: NaiveTime, end: NaiveTime },

    #[error("Leave request {id} is {from} and cannot become {to}")]
    InvalidTransition {
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt {table} row: {reason}")]
    Corrupt { table: &'static str, reason: String },

    #[error("Record store lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Unknown id, or a request that belongs to someone else.
    #[error("Leave request {id} not found")]
    NotFound { id: u64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
pub type StoreResult<T> = Result<T, StoreError>;

fn join_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_message_lists_dates() {
        let err = ConflictError::LeaveOverlap {
            dates: vec![
                NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "You already applied leave for these date(s): 2025-06-02, 2025-06-03"
        );
    }

    #[test]
    fn time_messages_use_minutes() {
        let err = ValidationError::EndNotAfterStart {
            start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        };
        assert_eq!(err.to_string(), "End time 09:30 must be after start time 10:00");
    }

    #[test]
    fn tracker_error_is_transparent() {
        let err: TrackerError = ValidationError::InvalidMonth(13).into();
        assert_eq!(err.to_string(), "Invalid month 13, expected 1-12");
    }
}
