use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::calendar::{days_between, overlap};
use crate::error::ConflictError;
use crate::model::{LeaveDates, LeaveRequest};

/// Rejects `proposed` when it shares a date with any pending or approved
/// request in `existing`. Rejected and cancelled requests free their dates.
pub fn detect(existing: &[LeaveRequest], proposed: &LeaveDates) -> Result<(), ConflictError> {
    let shared: BTreeSet<NaiveDate> = existing
        .iter()
        .filter(|l| !l.status.is_terminal())
        .filter_map(|l| overlap(&l.leave_dates, proposed))
        .flat_map(|(from, to)| days_between(from, to))
        .collect();

    if shared.is_empty() {
        Ok(())
    } else {
        Err(ConflictError::LeaveOverlap {
            dates: shared.into_iter().collect(),
        })
    }
}
