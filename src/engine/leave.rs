use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::Tracker;
use super::conflict;
use crate::error::{ConflictError, TrackerError, TrackerResult};
use crate::model::{LeaveDates, LeaveRequest, LeaveStatus, NewLeaveRequest};

/// A manager's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn target(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

impl Tracker {
    /// Checks `proposed` against the user's pending and approved requests.
    pub async fn check_conflict(&self, username: &str, proposed: &LeaveDates) -> TrackerResult<()> {
        let existing = self
            .store
            .leaves_for_user(username, &LeaveStatus::ACTIVE)
            .await?;
        conflict::detect(&existing, proposed)?;
        Ok(())
    }

    /// Files a new pending request unless it overlaps one the user already holds.
    #[instrument(skip(self, dates, reason), fields(dates = %dates))]
    pub async fn submit_leave(
        &self,
        username: &str,
        dates: LeaveDates,
        reason: Option<String>,
    ) -> TrackerResult<LeaveRequest> {
        dates.check()?;

        // the check and the insert must not interleave with another
        // submission from the same user
        let _guard = self.locks.acquire(username).await;

        self.check_conflict(username, &dates).await?;

        let leave = self
            .store
            .insert_leave(NewLeaveRequest {
                username: username.to_string(),
                leave_dates: dates,
                requested_on: self.clock.now(),
                reason: reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty()),
            })
            .await?;

        info!(leave_id = leave.id, "Leave request submitted");
        Ok(leave)
    }

    /// Approves or rejects a pending request.
    #[instrument(skip(self))]
    pub async fn decide_leave(&self, id: u64, decision: Decision) -> TrackerResult<LeaveRequest> {
        let leave = self
            .store
            .leave_by_id(id)
            .await?
            .ok_or(TrackerError::NotFound { id })?;

        let leave = self.transition(leave, decision.target()).await?;
        info!(status = %leave.status, "Leave request decided");
        Ok(leave)
    }

    /// Withdraws one of the user's own pending or approved requests.
    #[instrument(skip(self))]
    pub async fn cancel_leave(&self, username: &str, id: u64) -> TrackerResult<LeaveRequest> {
        let leave = self
            .store
            .leave_by_id(id)
            .await?
            .filter(|l| l.username == username)
            .ok_or(TrackerError::NotFound { id })?;

        let leave = self.transition(leave, LeaveStatus::Cancelled).await?;
        info!("Leave request cancelled");
        Ok(leave)
    }

    async fn transition(&self, mut leave: LeaveRequest, next: LeaveStatus) -> TrackerResult<LeaveRequest> {
        let current = leave.status;
        if !current.can_become(next) {
            return Err(ConflictError::InvalidTransition {
                id: leave.id,
                from: current,
                to: next,
            }
            .into());
        }
        // lost a race with another decision or cancellation
        if !self.store.set_leave_status(leave.id, current, next).await? {
            return Err(match self.store.leave_by_id(leave.id).await? {
                Some(now) => ConflictError::InvalidTransition {
                    id: now.id,
                    from: now.status,
                    to: next,
                }
                .into(),
                None => TrackerError::NotFound { id: leave.id },
            });
        }

        leave.status = next;
        Ok(leave)
    }

    /// The date spans of the user's approved requests, newest first.
    pub async fn approved_leave_for(&self, username: &str) -> TrackerResult<Vec<LeaveDates>> {
        let approved = self
            .store
            .leaves_for_user(username, &[LeaveStatus::Approved])
            .await?;
        Ok(approved.into_iter().map(|l| l.leave_dates).collect())
    }

    /// All of the user's requests, newest first.
    pub async fn leave_history(&self, username: &str) -> TrackerResult<Vec<LeaveRequest>> {
        Ok(self
            .store
            .leaves_for_user(
                username,
                &[
                    LeaveStatus::Pending,
                    LeaveStatus::Approved,
                    LeaveStatus::Rejected,
                    LeaveStatus::Cancelled,
                ],
            )
            .await?)
    }

    /// Requests awaiting a manager, oldest first.
    pub async fn pending_leaves(&self) -> TrackerResult<Vec<LeaveRequest>> {
        Ok(self.store.leaves_with_status(&[LeaveStatus::Pending]).await?)
    }

    pub async fn pending_leave_count(&self) -> TrackerResult<usize> {
        Ok(self.pending_leaves().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::clock::FixedClock;
    use crate::config::Policy;
    use crate::error::ValidationError;
    use crate::model::leave_request::MAX_LEAVE_DAYS;
    use crate::store::MemoryStore;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn tracker() -> Tracker {
        Tracker::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedClock::at(d(1), 10, 0)),
            Policy::default(),
        )
    }

    fn range(from: u32, to: u32) -> LeaveDates {
        LeaveDates::range(d(from), d(to)).unwrap()
    }

    #[actix_web::test]
    async fn new_requests_start_pending() {
        let tracker = tracker();
        let leave = tracker
            .submit_leave("asha", range(1, 3), Some("  wedding ".to_string()))
            .await
            .unwrap();
        assert_eq!(leave.status, LeaveStatus::Pending);
        assert_eq!(leave.reason.as_deref(), Some("wedding"));
        assert_eq!(leave.requested_on, d(1).and_hms_opt(10, 0, 0).unwrap());
    }

    #[actix_web::test]
    async fn blank_reason_is_dropped() {
        let tracker = tracker();
        let leave = tracker
            .submit_leave("asha", LeaveDates::single(d(5)), Some("   ".to_string()))
            .await
            .unwrap();
        assert_eq!(leave.reason, None);
    }

    #[actix_web::test]
    async fn overlapping_request_is_rejected() {
        let tracker = tracker();
        tracker.submit_leave("asha", range(1, 3), None).await.unwrap();

        let err = tracker
            .submit_leave("asha", LeaveDates::single(d(3)), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Conflict(ConflictError::LeaveOverlap { ref dates }) if dates == &vec![d(3)]
        ));

        // another user is unaffected
        tracker.submit_leave("ravi", range(1, 3), None).await.unwrap();
    }

    #[actix_web::test]
    async fn backwards_range_is_a_validation_error() {
        let tracker = tracker();
        let err = tracker
            .submit_leave("asha", LeaveDates::Range { from: d(5), to: d(3) }, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Validation(ValidationError::InvalidRange { .. })
        ));
        assert!(tracker.leave_history("asha").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn rejected_and_cancelled_dates_can_be_requested_again() {
        let tracker = tracker();
        let first = tracker.submit_leave("asha", range(1, 3), None).await.unwrap();
        tracker.decide_leave(first.id, Decision::Reject).await.unwrap();
        let second = tracker.submit_leave("asha", range(1, 3), None).await.unwrap();
        tracker.cancel_leave("asha", second.id).await.unwrap();
        tracker.submit_leave("asha", range(2, 2), None).await.unwrap();
    }

    #[actix_web::test]
    async fn decisions_only_apply_to_pending_requests() {
        let tracker = tracker();
        let leave = tracker.submit_leave("asha", range(1, 3), None).await.unwrap();

        let approved = tracker.decide_leave(leave.id, Decision::Approve).await.unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);

        let err = tracker
            .decide_leave(leave.id, Decision::Reject)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Conflict(ConflictError::InvalidTransition {
                from: LeaveStatus::Approved,
                to: LeaveStatus::Rejected,
                ..
            })
        ));
    }

    #[actix_web::test]
    async fn unknown_leave_is_not_found() {
        let tracker = tracker();
        let err = tracker.decide_leave(42, Decision::Approve).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { id: 42 }));
    }

    #[actix_web::test]
    async fn only_the_owner_can_cancel() {
        let tracker = tracker();
        let leave = tracker.submit_leave("asha", range(1, 3), None).await.unwrap();

        let err = tracker.cancel_leave("ravi", leave.id).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { .. }));

        let cancelled = tracker.cancel_leave("asha", leave.id).await.unwrap();
        assert_eq!(cancelled.status, LeaveStatus::Cancelled);
    }

    #[actix_web::test]
    async fn approved_leave_can_be_cancelled_but_terminal_states_stay() {
        let tracker = tracker();
        let leave = tracker.submit_leave("asha", range(1, 3), None).await.unwrap();
        tracker.decide_leave(leave.id, Decision::Approve).await.unwrap();
        tracker.cancel_leave("asha", leave.id).await.unwrap();

        assert!(tracker.cancel_leave("asha", leave.id).await.is_err());
        assert!(tracker.decide_leave(leave.id, Decision::Approve).await.is_err());
    }

    #[actix_web::test]
    async fn approved_leave_covers_only_approved_requests() {
        let tracker = tracker();
        let approved = tracker.submit_leave("asha", range(2, 4), None).await.unwrap();
        tracker.submit_leave("asha", LeaveDates::single(d(10)), None).await.unwrap();
        tracker.decide_leave(approved.id, Decision::Approve).await.unwrap();

        let spans = tracker.approved_leave_for("asha").await.unwrap();
        assert_eq!(spans, vec![range(2, 4)]);
    }

    #[actix_web::test]
    async fn oversized_span_is_a_validation_error() {
        let tracker = tracker();
        let err = tracker
            .submit_leave(
                "asha",
                LeaveDates::Range {
                    from: NaiveDate::from_ymd_opt(1, 1, 1).unwrap(),
                    to: NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Validation(ValidationError::LeaveTooLong { max: MAX_LEAVE_DAYS, .. })
        ));
        assert!(tracker.leave_history("asha").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn history_and_pending_lists() {
        let tracker = tracker();
        let a = tracker.submit_leave("asha", LeaveDates::single(d(2)), None).await.unwrap();
        let b = tracker.submit_leave("ravi", LeaveDates::single(d(2)), None).await.unwrap();
        let c = tracker.submit_leave("asha", LeaveDates::single(d(9)), None).await.unwrap();
        tracker.decide_leave(a.id, Decision::Reject).await.unwrap();

        let history: Vec<u64> = tracker
            .leave_history("asha")
            .await
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(history, vec![c.id, a.id]);

        let pending: Vec<u64> = tracker
            .pending_leaves()
            .await
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(pending, vec![b.id, c.id]);
        assert_eq!(tracker.pending_leave_count().await.unwrap(), 2);
    }

    #[actix_web::test]
    async fn concurrent_overlapping_submissions_book_once() {
        let tracker = tracker();
        let (first, second) = futures::join!(
            tracker.submit_leave("asha", range(1, 3), None),
            tracker.submit_leave("asha", range(2, 4), None),
        );
        assert!(first.is_ok() != second.is_ok());
        assert_eq!(tracker.leave_history("asha").await.unwrap().len(), 1);
    }
}
