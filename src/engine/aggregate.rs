use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::Tracker;
use super::calendar::Period;
use crate::config::Policy;
use crate::error::TrackerResult;
use crate::model::{Activity, LeaveRequest, LeaveStatus};
use crate::utils::rounding::{percent_of, round_hours, round_percent};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserProductivity {
    #[schema(example = "asha")]
    pub username: String,
    #[schema(example = 1260)]
    pub productive_minutes: i64,
    #[schema(example = 21.0)]
    pub productive_hours: f64,
    /// Distinct dates with at least one slot.
    #[schema(example = 3)]
    pub working_days: u32,
    #[schema(example = 21.0)]
    pub available_hours: f64,
    #[schema(example = 0.0)]
    pub idle_hours: f64,
    #[schema(example = 100.0)]
    pub productivity_pct: f64,
    /// Approved leave days inside the period.
    #[schema(example = 1)]
    pub leave_days: u32,
    #[schema(example = 33.3)]
    pub leave_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OverallProductivity {
    #[schema(example = 84.5)]
    pub overall_productivity: f64,
    #[schema(example = 12.5)]
    pub avg_leave_percent: f64,
    #[schema(example = 118.3)]
    pub total_productive_hours: f64,
    #[schema(example = 140.0)]
    pub total_available_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductivitySummary {
    pub period: Period,
    pub per_user: Vec<UserProductivity>,
    pub overall: OverallProductivity,
}

/// Manager landing view: the month's productivity plus the review backlog.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Dashboard {
    pub summary: ProductivitySummary,
    #[schema(example = 2)]
    pub pending_leave_count: usize,
}

#[derive(Default)]
struct UserTally {
    minutes: i64,
    days: BTreeSet<NaiveDate>,
}

/// Rolls a month of activity and approved leave up into per-user and overall figures.
///
/// Only users with activity in the period are listed. Leave days count the
/// approved dates that fall inside the period.
pub fn summarize(
    period: Period,
    activities: &[Activity],
    approved_leave: &[LeaveRequest],
    policy: &Policy,
) -> ProductivitySummary {
    let mut tallies: BTreeMap<&str, UserTally> = BTreeMap::new();
    for activity in activities.iter().filter(|a| period.contains(a.activity_date)) {
        let tally = tallies.entry(activity.username.as_str()).or_default();
        tally.minutes += activity.duration;
        tally.days.insert(activity.activity_date);
    }

    let mut leave_days: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
    for leave in approved_leave
        .iter()
        .filter(|l| l.status == LeaveStatus::Approved)
    {
        leave_days
            .entry(leave.username.as_str())
            .or_default()
            .extend(period.clip(&leave.leave_dates));
    }

    let per_user: Vec<UserProductivity> = tallies
        .into_iter()
        .map(|(username, tally)| {
            let leave_days = leave_days.get(username).map_or(0, |d| d.len() as u32);
            user_figures(username, &tally, leave_days, policy)
        })
        .collect();

    let total_productive: f64 = per_user.iter().map(|u| u.productive_hours).sum();
    let total_available: f64 = per_user.iter().map(|u| u.available_hours).sum();
    let avg_leave_percent = if per_user.is_empty() {
        0.0
    } else {
        per_user.iter().map(|u| u.leave_percent).sum::<f64>() / per_user.len() as f64
    };

    ProductivitySummary {
        period,
        overall: OverallProductivity {
            overall_productivity: round_percent(percent_of(total_productive, total_available)),
            avg_leave_percent: round_percent(avg_leave_percent),
            total_productive_hours: round_hours(total_productive),
            total_available_hours: round_hours(total_available),
        },
        per_user,
    }
}

fn user_figures(username: &str, tally: &UserTally, leave_days: u32, policy: &Policy) -> UserProductivity {
    let working_days = tally.days.len() as u32;
    let productive_hours = round_hours(tally.minutes as f64 / 60.0);
    let available_hours = round_hours(f64::from(working_days) * policy.nominal_workday_hours);
    let idle_hours = round_hours((available_hours - productive_hours).max(0.0));

    UserProductivity {
        username: username.to_string(),
        productive_minutes: tally.minutes,
        productive_hours,
        working_days,
        available_hours,
        idle_hours,
        productivity_pct: round_percent(percent_of(productive_hours, available_hours)),
        leave_days,
        leave_percent: round_percent(percent_of(f64::from(leave_days), f64::from(working_days))),
    }
}

impl Tracker {
    #[instrument(skip(self))]
    pub async fn aggregate(&self, month: u32, year: i32) -> TrackerResult<ProductivitySummary> {
        let period = Period::new(month, year)?;
        let activities = self.store.activities_in_period(period, None).await?;
        let approved = self
            .store
            .leaves_with_status(&[LeaveStatus::Approved])
            .await?;

        let summary = summarize(period, &activities, &approved, &self.policy);
        debug!(users = summary.per_user.len(), "Productivity aggregated");
        Ok(summary)
    }

    pub async fn dashboard(&self, month: u32, year: i32) -> TrackerResult<Dashboard> {
        Ok(Dashboard {
            summary: self.aggregate(month, year).await?,
            pending_leave_count: self.pending_leave_count().await?,
        })
    }
}
