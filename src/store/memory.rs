use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use super::RecordStore;
use crate::engine::calendar::Period;
use crate::error::{StoreError, StoreResult};
use crate::model::{Activity, LeaveRequest, LeaveStatus, NewActivity, NewLeaveRequest};

#[derive(Default)]
struct Tables {
    leaves: Vec<LeaveRequest>,
    activities: Vec<Activity>,
    next_leave_id: u64,
    next_activity_id: u64,
}

/// Process-local store. Every write happens under one write lock, so each
/// call is atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_leave(&self, leave: NewLeaveRequest) -> StoreResult<LeaveRequest> {
        let mut tables = self.write()?;
        tables.next_leave_id += 1;
        let row = leave.into_request(tables.next_leave_id);
        tables.leaves.push(row.clone());
        Ok(row)
    }

    async fn leave_by_id(&self, id: u64) -> StoreResult<Option<LeaveRequest>> {
        Ok(self.read()?.leaves.iter().find(|l| l.id == id).cloned())
    }

    async fn leaves_for_user(
        &self,
        username: &str,
        statuses: &[LeaveStatus],
    ) -> StoreResult<Vec<LeaveRequest>> {
        let tables = self.read()?;
        let mut rows: Vec<_> = tables
            .leaves
            .iter()
            .filter(|l| l.username == username && statuses.contains(&l.status))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn leaves_with_status(&self, statuses: &[LeaveStatus]) -> StoreResult<Vec<LeaveRequest>> {
        let tables = self.read()?;
        Ok(tables
            .leaves
            .iter()
            .filter(|l| statuses.contains(&l.status))
            .cloned()
            .collect())
    }

    async fn set_leave_status(
        &self,
        id: u64,
        expected: LeaveStatus,
        next: LeaveStatus,
    ) -> StoreResult<bool> {
        let mut tables = self.write()?;
        match tables
            .leaves
            .iter_mut()
            .find(|l| l.id == id && l.status == expected)
        {
            Some(leave) => {
                leave.status = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn replace_activities(&self, batch: Vec<NewActivity>) -> StoreResult<Vec<Activity>> {
        let mut tables = self.write()?;
        let mut written = Vec::with_capacity(batch.len());
        for row in batch {
            tables.activities.retain(|a| !row.same_slot(a));
            written.retain(|a: &Activity| !row.same_slot(a));
            tables.next_activity_id += 1;
            let activity = row.into_activity(tables.next_activity_id);
            tables.activities.push(activity.clone());
            written.push(activity);
        }
        Ok(written)
    }

    async fn activities_for_user(&self, username: &str) -> StoreResult<Vec<Activity>> {
        let tables = self.read()?;
        Ok(tables
            .activities
            .iter()
            .filter(|a| a.username == username)
            .cloned()
            .collect())
    }

    async fn activities_in_period(
        &self,
        period: Period,
        username: Option<&str>,
    ) -> StoreResult<Vec<Activity>> {
        let tables = self.read()?;
        let mut rows: Vec<_> = tables
            .activities
            .iter()
            .filter(|a| period.contains(a.activity_date))
            .filter(|a| username.is_none_or(|u| a.username == u))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.activity_date, a.start_time));
        Ok(rows)
    }

    async fn activities_on(&self, username: &str, date: NaiveDate) -> StoreResult<Vec<Activity>> {
        let tables = self.read()?;
        let mut rows: Vec<_> = tables
            .activities
            .iter()
            .filter(|a| a.username == username && a.activity_date == date)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.start_time);
        Ok(rows)
    }

    async fn activity_years(&self, username: &str) -> StoreResult<Vec<i32>> {
        let tables = self.read()?;
        let years: BTreeSet<i32> = tables
            .activities
            .iter()
            .filter(|a| a.username == username)
            .map(|a| a.activity_date.year())
            .collect();
        Ok(years.into_iter().collect())
    }
}
