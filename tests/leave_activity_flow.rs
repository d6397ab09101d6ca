use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use daily_tracker::clock::FixedClock;
use daily_tracker::config::Policy;
use daily_tracker::engine::{Decision, Tracker};
use daily_tracker::error::{ConflictError, TrackerError};
use daily_tracker::model::{ActivitySlot, ActivitySubmission, LeaveDates, LeaveStatus};
use daily_tracker::store::MemoryStore;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn tracker_at(now: NaiveDateTime) -> Tracker {
    Tracker::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedClock::new(now)),
        Policy::default(),
    )
}

fn day(date: &str, name: &str, start: &str, end: &str) -> ActivitySubmission {
    ActivitySubmission {
        activity_date: date.to_string(),
        clock_in: Some("09:00".to_string()),
        clock_out: Some("18:00".to_string()),
        slots: vec![ActivitySlot::new(name, start, end)],
    }
}

#[actix_web::test]
async fn leave_blocks_activity_only_while_approved() {
    let tracker = tracker_at(d(4).and_hms_opt(9, 30, 0).unwrap());

    let leave = tracker
        .submit_leave("asha", LeaveDates::range(d(1), d(3)).unwrap(), None)
        .await
        .unwrap();
    assert_eq!(leave.status, LeaveStatus::Pending);

    // pending leave does not block
    tracker
        .submit_activities("asha", &day("2025-06-02", "Standup", "09:00", "09:30"))
        .await
        .unwrap();

    tracker.decide_leave(leave.id, Decision::Approve).await.unwrap();
    let err = tracker
        .submit_activities("asha", &day("2025-06-02", "Review", "10:00", "11:00"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerError::Conflict(ConflictError::OnApprovedLeave { date }) if date == d(2)
    ));

    let cancelled = tracker.cancel_leave("asha", leave.id).await.unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);

    let receipt = tracker
        .submit_activities("asha", &day("2025-06-02", "Review", "10:00", "11:00"))
        .await
        .unwrap();
    assert_eq!(receipt.accepted.len(), 1);
    assert_eq!(tracker.day_activities("asha", d(2)).await.unwrap().len(), 2);
}

#[actix_web::test]
async fn future_dates_and_times_are_blocked() {
    let tracker = tracker_at(d(10).and_hms_opt(12, 0, 0).unwrap());

    let err = tracker
        .submit_activities("asha", &day("2025-06-11", "Plan", "08:00", "09:00"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerError::Conflict(ConflictError::FutureDate { .. })
    ));

    let err = tracker
        .submit_activities("asha", &day("2025-06-10", "Plan", "12:30", "13:00"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerError::Conflict(ConflictError::FutureTime { .. })
    ));

    tracker
        .submit_activities("asha", &day("2025-06-10", "Plan", "11:00", "11:45"))
        .await
        .unwrap();
}

#[actix_web::test]
async fn resubmitted_slot_keeps_the_latest_name() {
    let tracker = tracker_at(d(10).and_hms_opt(20, 0, 0).unwrap());
    for name in ["Draft", "Rewrite", "Final"] {
        tracker
            .submit_activities("asha", &day("2025-06-09", name, "14:00", "15:15"))
            .await
            .unwrap();
    }

    let rows = tracker.day_activities("asha", d(9)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].activity_name, "Final");
    assert_eq!(rows[0].duration, 75);
}

#[actix_web::test]
async fn month_rolls_up_into_report_and_dashboard() {
    let tracker = tracker_at(d(30).and_hms_opt(20, 0, 0).unwrap());
    tracker
        .submit_activities("asha", &day("2025-06-02", "Build", "09:00", "16:00"))
        .await
        .unwrap();
    tracker
        .submit_activities("ravi", &day("2025-06-02", "Build", "09:00", "12:30"))
        .await
        .unwrap();

    let leave = tracker
        .submit_leave("ravi", LeaveDates::single(d(20)), Some("Doctor".to_string()))
        .await
        .unwrap();
    tracker.decide_leave(leave.id, Decision::Approve).await.unwrap();
    tracker
        .submit_leave("asha", LeaveDates::single(d(27)), None)
        .await
        .unwrap();

    let dashboard = tracker.dashboard(6, 2025).await.unwrap();
    assert_eq!(dashboard.pending_leave_count, 1);
    let summary = &dashboard.summary;
    assert_eq!(summary.per_user.len(), 2);
    assert_eq!(summary.per_user[0].productivity_pct, 100.0);
    assert_eq!(summary.per_user[1].productivity_pct, 50.0);
    assert_eq!(summary.per_user[1].leave_days, 1);
    assert_eq!(summary.overall.overall_productivity, 75.0);
    assert_eq!(summary.overall.avg_leave_percent, 50.0);

    let report = tracker.build_report("ravi", 6, 2025).await.unwrap();
    assert_eq!(report.days.len(), 2);
    assert_eq!(report.totals.leaves, 1);
    assert_eq!(report.years, vec![2025]);
}
