use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::Tracker;
use crate::clock::to_minute;
use crate::error::{ConflictError, TrackerResult, ValidationError};
use crate::model::leave_request::parse_date;
use crate::model::{Activity, ActivitySubmission, LeaveDates, NewActivity};

/// Outcome of an accepted submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityReceipt {
    #[schema(example = "2025-06-02", format = "date", value_type = String)]
    pub activity_date: NaiveDate,
    /// Rows now stored for the submitted slots.
    pub accepted: Vec<Activity>,
    /// Slots ignored because their name was blank.
    #[schema(example = 0)]
    pub skipped: usize,
}

/// A submission that passed every rule and can be written as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    pub activity_date: NaiveDate,
    pub rows: Vec<NewActivity>,
    pub skipped: usize,
}

/// Parses `HH:MM` (seconds tolerated).
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

fn bookend(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Applies the submission rules in order and stops at the first failure.
///
/// 1. the date must not be an approved leave day
/// 2. the date must not be after today
/// 3. per slot, in order: blank names are skipped, end must be after start,
///    and on today neither end may be later than `now` (minute precision)
///
/// Nothing is written here, so a failing slot leaves no partial batch behind.
pub fn validate_submission(
    username: &str,
    submission: &ActivitySubmission,
    approved_leave: &[LeaveDates],
    now: NaiveDateTime,
) -> TrackerResult<ValidatedBatch> {
    let activity_date = parse_date(&submission.activity_date)?;
    let today = now.date();
    let now_time = to_minute(now.time());

    if approved_leave.iter().any(|l| l.covers(activity_date)) {
        return Err(ConflictError::OnApprovedLeave { date: activity_date }.into());
    }
    if activity_date > today {
        return Err(ConflictError::FutureDate { date: activity_date }.into());
    }

    let clock_in = bookend(submission.clock_in.as_ref());
    let clock_out = bookend(submission.clock_out.as_ref());

    let mut rows = Vec::with_capacity(submission.slots.len());
    let mut skipped = 0;

    for slot in &submission.slots {
        let name = slot.name.trim();
        if name.is_empty() {
            skipped += 1;
            continue;
        }

        let start = parse_time(&slot.start_time)?;
        let end = parse_time(&slot.end_time)?;

        if end <= start {
            return Err(ValidationError::EndNotAfterStart { start, end }.into());
        }
        if activity_date == today && (start > now_time || end > now_time) {
            return Err(ConflictError::FutureTime { start, end }.into());
        }

        rows.push(NewActivity {
            username: username.to_string(),
            activity_date,
            clock_in: clock_in.clone(),
            clock_out: clock_out.clone(),
            activity_name: name.to_string(),
            start_time: start,
            end_time: end,
            duration: (end - start).num_minutes(),
            submitted_at: now,
        });
    }

    Ok(ValidatedBatch {
        activity_date,
        rows,
        skipped,
    })
}

impl Tracker {
    /// Validates the whole submission, then replaces every submitted slot in
    /// one atomic store write.
    #[instrument(skip(self, submission), fields(date = %submission.activity_date, slots = submission.slots.len()))]
    pub async fn submit_activities(
        &self,
        username: &str,
        submission: &ActivitySubmission,
    ) -> TrackerResult<ActivityReceipt> {
        // keeps one user's batches in a serial order
        let _guard = self.locks.acquire(username).await;

        let approved = self.approved_leave_for(username).await?;
        let batch = validate_submission(username, submission, &approved, self.clock.now())?;

        let accepted = if batch.rows.is_empty() {
            Vec::new()
        } else {
            self.store.replace_activities(batch.rows).await?
        };

        info!(accepted = accepted.len(), skipped = batch.skipped, "Activities recorded");
        Ok(ActivityReceipt {
            activity_date: batch.activity_date,
            accepted,
            skipped: batch.skipped,
        })
    }

    /// The user's slots on one date, by start time.
    pub async fn day_activities(&self, username: &str, date: NaiveDate) -> TrackerResult<Vec<Activity>> {
        Ok(self.store.activities_on(username, date).await?)
    }
}
