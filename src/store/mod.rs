//! Abstract record store the accounting engine reads from and writes to.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::engine::calendar::Period;
use crate::error::StoreResult;
use crate::model::{Activity, LeaveRequest, LeaveStatus, NewActivity, NewLeaveRequest};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new pending request and returns it with its id.
    async fn insert_leave(&self, leave: NewLeaveRequest) -> StoreResult<LeaveRequest>;

    async fn leave_by_id(&self, id: u64) -> StoreResult<Option<LeaveRequest>>;

    /// A user's requests whose status is in `statuses`, newest (highest id) first.
    async fn leaves_for_user(
        &self,
        username: &str,
        statuses: &[LeaveStatus],
    ) -> StoreResult<Vec<LeaveRequest>>;

    /// Everybody's requests whose status is in `statuses`, oldest first.
    async fn leaves_with_status(&self, statuses: &[LeaveStatus]) -> StoreResult<Vec<LeaveRequest>>;

    /// Moves request `id` from `expected` to `next`. Returns false when the
    /// request is missing or no longer in `expected`.
    async fn set_leave_status(
        &self,
        id: u64,
        expected: LeaveStatus,
        next: LeaveStatus,
    ) -> StoreResult<bool>;

    /// Deletes every row sharing a slot key with `batch` and inserts the batch,
    /// in order, as one atomic unit.
    async fn replace_activities(&self, batch: Vec<NewActivity>) -> StoreResult<Vec<Activity>>;

    async fn activities_for_user(&self, username: &str) -> StoreResult<Vec<Activity>>;

    /// Activity dated within `period`, for one user or everybody, ordered by
    /// (date, start).
    async fn activities_in_period(
        &self,
        period: Period,
        username: Option<&str>,
    ) -> StoreResult<Vec<Activity>>;

    /// One user's activity on `date`, ordered by start time.
    async fn activities_on(&self, username: &str, date: NaiveDate) -> StoreResult<Vec<Activity>>;

    /// Distinct years with activity for `username`, ascending.
    async fn activity_years(&self, username: &str) -> StoreResult<Vec<i32>>;
}
