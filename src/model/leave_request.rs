use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Separator used by the textual form of a date range, e.g. `2025-03-10 to 2025-03-12`.
const RANGE_SEPARATOR: &str = " to ";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest span one request may cover, in calendar days.
pub const MAX_LEAVE_DAYS: i64 = 366;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveKind {
    Single,
    Multiple,
}

/// Lifecycle of a leave request. Discriminants are the stored status codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending = 0,
    Approved = 2,
    Rejected = 3,
    Cancelled = 4,
}

impl LeaveStatus {
    /// Statuses that still hold their dates.
    pub const ACTIVE: [LeaveStatus; 2] = [LeaveStatus::Pending, LeaveStatus::Approved];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LeaveStatus::Pending),
            2 => Some(LeaveStatus::Approved),
            3 => Some(LeaveStatus::Rejected),
            4 => Some(LeaveStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LeaveStatus::Rejected | LeaveStatus::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_become(self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (LeaveStatus::Pending, LeaveStatus::Approved)
                | (LeaveStatus::Pending, LeaveStatus::Rejected)
                | (LeaveStatus::Pending, LeaveStatus::Cancelled)
                | (LeaveStatus::Approved, LeaveStatus::Cancelled)
        )
    }
}

/// The calendar dates a leave request claims: one day, or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LeaveDates {
    Single { date: NaiveDate },
    Range { from: NaiveDate, to: NaiveDate },
}

impl LeaveDates {
    pub fn single(date: NaiveDate) -> Self {
        LeaveDates::Single { date }
    }

    /// Builds a range, rejecting `to < from` and spans over [`MAX_LEAVE_DAYS`].
    pub fn range(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        let dates = LeaveDates::Range { from, to };
        dates.check()?;
        Ok(dates)
    }

    /// Re-applies the construction rules to a value built directly.
    pub fn check(&self) -> Result<(), ValidationError> {
        let (from, to) = (self.first(), self.last());
        if to < from {
            return Err(ValidationError::InvalidRange { from, to });
        }
        let days = self.day_count();
        if days > MAX_LEAVE_DAYS {
            return Err(ValidationError::LeaveTooLong {
                days,
                max: MAX_LEAVE_DAYS,
            });
        }
        Ok(())
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.first() <= date && date <= self.last()
    }

    pub fn kind(&self) -> LeaveKind {
        match self {
            LeaveDates::Single { .. } => LeaveKind::Single,
            LeaveDates::Range { .. } => LeaveKind::Multiple,
        }
    }

    pub fn first(&self) -> NaiveDate {
        match *self {
            LeaveDates::Single { date } => date,
            LeaveDates::Range { from, .. } => from,
        }
    }

    pub fn last(&self) -> NaiveDate {
        match *self {
            LeaveDates::Single { date } => date,
            LeaveDates::Range { to, .. } => to,
        }
    }

    /// Number of calendar days covered, `(to - from).days + 1` for a range.
    pub fn day_count(&self) -> i64 {
        (self.last() - self.first()).num_days() + 1
    }
}

impl fmt::Display for LeaveDates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveDates::Single { date } => write!(f, "{}", date.format(DATE_FORMAT)),
            LeaveDates::Range { from, to } => write!(
                f,
                "{}{}{}",
                from.format(DATE_FORMAT),
                RANGE_SEPARATOR,
                to.format(DATE_FORMAT)
            ),
        }
    }
}

impl FromStr for LeaveDates {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(RANGE_SEPARATOR) {
            Some((from, to)) => {
                let from = parse_date(from.trim())?;
                let to = parse_date(to.trim())?;
                LeaveDates::range(from, to)
            }
            None if s.is_empty() => Err(ValidationError::InvalidLeaveDates(s.to_string())),
            None => parse_date(s).map(LeaveDates::single),
        }
    }
}

/// Parses an ISO `YYYY-MM-DD` date with a four-digit year.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    // chrono's %Y also takes signed and longer years
    let shaped = trimmed.len() == 10
        && trimmed.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(ValidationError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "asha")]
    pub username: String,
    pub leave_type: LeaveKind,
    pub leave_dates: LeaveDates,
    pub status: LeaveStatus,
    #[schema(example = "2025-06-01T09:30:00", format = "date-time", value_type = String)]
    pub requested_on: NaiveDateTime,
    #[schema(example = "Family function", nullable = true)]
    pub reason: Option<String>,
}

/// A leave request as submitted, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaveRequest {
    pub username: String,
    pub leave_dates: LeaveDates,
    pub requested_on: NaiveDateTime,
    pub reason: Option<String>,
}

impl NewLeaveRequest {
    /// Every new request starts out pending.
    pub fn into_request(self, id: u64) -> LeaveRequest {
        LeaveRequest {
            id,
            username: self.username,
            leave_type: self.leave_dates.kind(),
            leave_dates: self.leave_dates,
            status: LeaveStatus::Pending,
            requested_on: self.requested_on,
            reason: self.reason,
        }
    }
}
