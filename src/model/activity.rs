use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored activity slot. `(username, activity_date, start_time, end_time)`
/// identifies at most one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Activity {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "asha")]
    pub username: String,
    #[schema(example = "2025-06-02", format = "date", value_type = String)]
    pub activity_date: NaiveDate,
    #[schema(example = "09:00", nullable = true)]
    pub clock_in: Option<String>,
    #[schema(example = "18:00", nullable = true)]
    pub clock_out: Option<String>,
    #[schema(example = "Code review")]
    pub activity_name: String,
    #[schema(example = "09:30:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "11:00:00", value_type = String)]
    pub end_time: NaiveTime,
    /// Minutes between start and end.
    #[schema(example = 90)]
    pub duration: i64,
    #[schema(example = "2025-06-02T18:05:00", format = "date-time", value_type = String)]
    pub submitted_at: NaiveDateTime,
}

/// An accepted slot ready to be written; replaces any row with the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub username: String,
    pub activity_date: NaiveDate,
    pub clock_in: Option<String>,
    pub clock_out: Option<String>,
    pub activity_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration: i64,
    pub submitted_at: NaiveDateTime,
}

impl NewActivity {
    pub fn same_slot(&self, other: &Activity) -> bool {
        self.username == other.username
            && self.activity_date == other.activity_date
            && self.start_time == other.start_time
            && self.end_time == other.end_time
    }

    pub fn into_activity(self, id: u64) -> Activity {
        Activity {
            id,
            username: self.username,
            activity_date: self.activity_date,
            clock_in: self.clock_in,
            clock_out: self.clock_out,
            activity_name: self.activity_name,
            start_time: self.start_time,
            end_time: self.end_time,
            duration: self.duration,
            submitted_at: self.submitted_at,
        }
    }
}

/// One row of an activity form, as typed by the employee.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ActivitySlot {
    #[schema(example = "Code review")]
    pub name: String,
    #[schema(example = "09:30")]
    pub start_time: String,
    #[schema(example = "11:00")]
    pub end_time: String,
}

impl ActivitySlot {
    pub fn new(name: &str, start_time: &str, end_time: &str) -> Self {
        Self {
            name: name.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }
}

/// A day's activity form: the bookends plus its slots.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ActivitySubmission {
    #[schema(example = "2025-06-02")]
    pub activity_date: String,
    #[schema(example = "09:00", nullable = true)]
    pub clock_in: Option<String>,
    #[schema(example = "18:00", nullable = true)]
    pub clock_out: Option<String>,
    pub slots: Vec<ActivitySlot>,
}
