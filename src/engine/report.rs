use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use strum_macros::Display;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::Tracker;
use super::aggregate::{UserProductivity, summarize};
use super::calendar::Period;
use crate::config::Policy;
use crate::error::TrackerResult;
use crate::model::{Activity, LeaveRequest, LeaveStatus};
use crate::utils::rounding::{percent_of, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DayKind {
    Leave,
    Activity,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportDay {
    #[schema(example = "2025-06-02", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub kind: DayKind,
    /// Recorded minutes on the date.
    #[schema(example = 390)]
    pub minutes: i64,
    /// Share of the nominal workday; absent on leave days.
    #[schema(example = 92.86, nullable = true)]
    pub productivity_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportTotals {
    #[schema(example = 1260)]
    pub productive_minutes: i64,
    #[schema(example = 21.0)]
    pub productive_hours: f64,
    #[schema(example = 3)]
    pub working_days: u32,
    #[schema(example = 21.0)]
    pub available_hours: f64,
    #[schema(example = 0.0)]
    pub idle_hours: f64,
    #[schema(example = 100.0)]
    pub productivity_pct: f64,
    /// Distinct approved leave days in the period.
    #[schema(example = 2)]
    pub leaves: u32,
}

impl ReportTotals {
    fn empty(leaves: u32) -> Self {
        Self {
            productive_minutes: 0,
            productive_hours: 0.0,
            working_days: 0,
            available_hours: 0.0,
            idle_hours: 0.0,
            productivity_pct: 0.0,
            leaves,
        }
    }
}

impl From<UserProductivity> for ReportTotals {
    fn from(user: UserProductivity) -> Self {
        Self {
            productive_minutes: user.productive_minutes,
            productive_hours: user.productive_hours,
            working_days: user.working_days,
            available_hours: user.available_hours,
            idle_hours: user.idle_hours,
            productivity_pct: user.productivity_pct,
            leaves: user.leave_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyReport {
    #[schema(example = "asha")]
    pub username: String,
    pub period: Period,
    /// Leave and activity days of the period, ascending.
    pub days: Vec<ReportDay>,
    pub totals: ReportTotals,
    /// Years with any recorded activity, for the period picker.
    #[schema(example = json!([2024, 2025]))]
    pub years: Vec<i32>,
}

/// One date of a monthly activity log.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LogDay {
    #[schema(example = "2025-06-02", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub entries: Vec<Activity>,
}

/// Merges a user's activity and approved leave into one chronological list
/// for `period`. A date on approved leave is a leave day even if activity was
/// recorded on it.
pub fn report_days(
    period: Period,
    activities: &[Activity],
    approved_leave: &[LeaveRequest],
    policy: &Policy,
) -> Vec<ReportDay> {
    let leave_dates: BTreeSet<NaiveDate> = approved_leave
        .iter()
        .filter(|l| l.status == LeaveStatus::Approved)
        .flat_map(|l| period.clip(&l.leave_dates))
        .collect();

    let mut minutes: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for activity in activities.iter().filter(|a| period.contains(a.activity_date)) {
        *minutes.entry(activity.activity_date).or_default() += activity.duration;
    }

    let workday_minutes = policy.nominal_workday_minutes();
    let mut days: BTreeMap<NaiveDate, ReportDay> = minutes
        .into_iter()
        .map(|(date, minutes)| {
            let day = ReportDay {
                date,
                kind: DayKind::Activity,
                minutes,
                productivity_pct: Some(round_to(percent_of(minutes as f64, workday_minutes), 2)),
            };
            (date, day)
        })
        .collect();

    for date in leave_dates {
        let day = days.entry(date).or_insert(ReportDay {
            date,
            kind: DayKind::Leave,
            minutes: 0,
            productivity_pct: None,
        });
        day.kind = DayKind::Leave;
        day.productivity_pct = None;
    }

    days.into_values().collect()
}

/// Groups `activities` by date, keeping their order within a date.
pub fn group_by_date(activities: Vec<Activity>) -> Vec<LogDay> {
    let mut days: BTreeMap<NaiveDate, Vec<Activity>> = BTreeMap::new();
    for activity in activities {
        days.entry(activity.activity_date).or_default().push(activity);
    }
    days.into_iter()
        .map(|(date, entries)| LogDay { date, entries })
        .collect()
}

impl Tracker {
    #[instrument(skip(self))]
    pub async fn build_report(&self, username: &str, month: u32, year: i32) -> TrackerResult<DailyReport> {
        let period = Period::new(month, year)?;
        let activities = self.store.activities_for_user(username).await?;
        let approved = self
            .store
            .leaves_for_user(username, &[LeaveStatus::Approved])
            .await?;

        let days = report_days(period, &activities, &approved, &self.policy);
        let summary = summarize(period, &activities, &approved, &self.policy);
        let totals = match summary.per_user.into_iter().next() {
            Some(user) => ReportTotals::from(user),
            None => {
                let leaves = days.iter().filter(|d| d.kind == DayKind::Leave).count();
                ReportTotals::empty(leaves as u32)
            }
        };
        let years = self.store.activity_years(username).await?;

        debug!(days = days.len(), "Report built");
        Ok(DailyReport {
            username: username.to_string(),
            period,
            days,
            totals,
            years,
        })
    }

    /// A user's slots in the month, grouped by date.
    pub async fn monthly_log(&self, username: &str, month: u32, year: i32) -> TrackerResult<Vec<LogDay>> {
        let period = Period::new(month, year)?;
        let activities = self
            .store
            .activities_in_period(period, Some(username))
            .await?;
        Ok(group_by_date(activities))
    }
}
