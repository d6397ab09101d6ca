use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{FromRow, MySqlPool};

use super::RecordStore;
use crate::engine::calendar::Period;
use crate::error::{StoreError, StoreResult};
use crate::model::{Activity, LeaveDates, LeaveRequest, LeaveStatus, NewActivity, NewLeaveRequest};

const LEAVE_COLUMNS: &str = "id, username, leave_dates, status, requested_on, reason";
const ACTIVITY_COLUMNS: &str = "id, username, activity_date, clock_in, clock_out, activity_name, \
     start_time, end_time, duration, submitted_at";

#[derive(FromRow)]
struct LeaveRow {
    id: u64,
    username: String,
    leave_dates: String,
    status: u8,
    requested_on: NaiveDateTime,
    reason: Option<String>,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let leave_dates: LeaveDates = row.leave_dates.parse().map_err(|e| StoreError::Corrupt {
            table: "leave_requests",
            reason: format!("id {}: {}", row.id, e),
        })?;
        let status = LeaveStatus::from_code(row.status).ok_or_else(|| StoreError::Corrupt {
            table: "leave_requests",
            reason: format!("id {}: unknown status {}", row.id, row.status),
        })?;

        Ok(LeaveRequest {
            id: row.id,
            username: row.username,
            leave_type: leave_dates.kind(),
            leave_dates,
            status,
            requested_on: row.requested_on,
            reason: row.reason,
        })
    }
}

#[derive(FromRow)]
struct ActivityRow {
    id: u64,
    username: String,
    activity_date: NaiveDate,
    clock_in: Option<String>,
    clock_out: Option<String>,
    activity_name: String,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration: i32,
    submitted_at: NaiveDateTime,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Activity {
            id: row.id,
            username: row.username,
            activity_date: row.activity_date,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            activity_name: row.activity_name,
            start_time: row.start_time,
            end_time: row.end_time,
            duration: i64::from(row.duration),
            submitted_at: row.submitted_at,
        }
    }
}

/// `?, ?, ?` for an `IN (...)` list.
fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn leaves_from_rows(rows: Vec<LeaveRow>) -> StoreResult<Vec<LeaveRequest>> {
    rows.into_iter().map(LeaveRequest::try_from).collect()
}

/// Record store backed by the MySQL tables created in [`crate::db::init_schema`].
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for MySqlStore {
    async fn insert_leave(&self, leave: NewLeaveRequest) -> StoreResult<LeaveRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (username, leave_type, leave_dates, status, requested_on, reason)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&leave.username)
        .bind(leave.leave_dates.kind().to_string())
        .bind(leave.leave_dates.to_string())
        .bind(LeaveStatus::Pending.code())
        .bind(leave.requested_on)
        .bind(&leave.reason)
        .execute(&self.pool)
        .await?;

        Ok(leave.into_request(result.last_insert_id()))
    }

    async fn leave_by_id(&self, id: u64) -> StoreResult<Option<LeaveRequest>> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");
        let row = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(LeaveRequest::try_from).transpose()
    }

    async fn leaves_for_user(
        &self,
        username: &str,
        statuses: &[LeaveStatus],
    ) -> StoreResult<Vec<LeaveRequest>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests \
             WHERE username = ? AND status IN ({}) ORDER BY id DESC",
            placeholders(statuses.len())
        );
        let mut query = sqlx::query_as::<_, LeaveRow>(&sql).bind(username);
        for status in statuses {
            query = query.bind(status.code());
        }

        leaves_from_rows(query.fetch_all(&self.pool).await?)
    }

    async fn leaves_with_status(&self, statuses: &[LeaveStatus]) -> StoreResult<Vec<LeaveRequest>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE status IN ({}) ORDER BY id",
            placeholders(statuses.len())
        );
        let mut query = sqlx::query_as::<_, LeaveRow>(&sql);
        for status in statuses {
            query = query.bind(status.code());
        }

        leaves_from_rows(query.fetch_all(&self.pool).await?)
    }

    async fn set_leave_status(
        &self,
        id: u64,
        expected: LeaveStatus,
        next: LeaveStatus,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?
            WHERE id = ?
            AND status = ?
            "#,
        )
        .bind(next.code())
        .bind(id)
        .bind(expected.code())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn replace_activities(&self, batch: Vec<NewActivity>) -> StoreResult<Vec<Activity>> {
        let mut tx = self.pool.begin().await?;
        let mut written: Vec<Activity> = Vec::with_capacity(batch.len());

        for row in batch {
            sqlx::query(
                r#"
                DELETE FROM activities
                WHERE username = ?
                AND activity_date = ?
                AND start_time = ?
                AND end_time = ?
                "#,
            )
            .bind(&row.username)
            .bind(row.activity_date)
            .bind(row.start_time)
            .bind(row.end_time)
            .execute(&mut *tx)
            .await?;

            let result = sqlx::query(
                r#"
                INSERT INTO activities (
                    username, activity_date, clock_in,
                    activity_name, start_time, end_time,
                    duration, clock_out, submitted_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&row.username)
            .bind(row.activity_date)
            .bind(&row.clock_in)
            .bind(&row.activity_name)
            .bind(row.start_time)
            .bind(row.end_time)
            .bind(row.duration)
            .bind(&row.clock_out)
            .bind(row.submitted_at)
            .execute(&mut *tx)
            .await?;

            written.retain(|a| !row.same_slot(a));
            written.push(row.into_activity(result.last_insert_id()));
        }

        tx.commit().await?;
        Ok(written)
    }

    async fn activities_for_user(&self, username: &str) -> StoreResult<Vec<Activity>> {
        let sql = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities \
             WHERE username = ? ORDER BY activity_date, start_time"
        );
        let rows = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Activity::from).collect())
    }

    async fn activities_in_period(
        &self,
        period: Period,
        username: Option<&str>,
    ) -> StoreResult<Vec<Activity>> {
        let mut where_sql = String::from(" WHERE activity_date BETWEEN ? AND ?");
        if username.is_some() {
            where_sql.push_str(" AND username = ?");
        }

        let sql = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities{where_sql} ORDER BY activity_date, start_time"
        );
        let mut query = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(period.first_day())
            .bind(period.last_day());
        if let Some(username) = username {
            query = query.bind(username);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Activity::from).collect())
    }

    async fn activities_on(&self, username: &str, date: NaiveDate) -> StoreResult<Vec<Activity>> {
        let sql = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities \
             WHERE username = ? AND activity_date = ? ORDER BY start_time"
        );
        let rows = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(username)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Activity::from).collect())
    }

    async fn activity_years(&self, username: &str) -> StoreResult<Vec<i32>> {
        let years = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT CAST(YEAR(activity_date) AS SIGNED) AS year
            FROM activities
            WHERE username = ?
            ORDER BY year
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        years
            .into_iter()
            .map(|y| {
                i32::try_from(y).map_err(|_| StoreError::Corrupt {
                    table: "activities",
                    reason: format!("year {y} out of range"),
                })
            })
            .collect()
    }
}
