use crate::api::leave_request::{DecisionForm, LeaveForm, LeaveListResponse};
use crate::api::report::EmployeeLog;
use crate::api::{DayQuery, MonthQuery};
use crate::engine::{
    ActivityReceipt, DailyReport, Dashboard, DayKind, Decision, LogDay, OverallProductivity, Period,
    ProductivitySummary, ReportDay, ReportTotals, UserProductivity,
};
use crate::model::{
    Activity, ActivitySlot, ActivitySubmission, LeaveDates, LeaveKind, LeaveRequest, LeaveStatus,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Daily Tracker API",
        version = "1.0.0",
        description = r#"
## Daily activity and leave tracker

Employees log what they worked on, slot by slot, and request leave.
Managers review leave and follow productivity month by month.

### Key Features
- **Leave**
  - Single-day or date-range requests, overlap checks, approve/reject, self-service cancel
- **Activity**
  - Daily slots with start and end times; resubmitting a slot replaces it
- **Reports**
  - Daily report per employee, productivity dashboard for managers

### Identity
The gateway in front of this service authenticates users and forwards
`X-User` (username) and `X-Role` (`employee` or `manager`).

### Errors
Rejections come back as `{"message": "..."}` with 400 (bad input),
404 (unknown leave request) or 409 (not allowed right now).
"#,
    ),
    paths(
        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_history,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::decide_leave,

        crate::api::activity::submit_activities,
        crate::api::activity::day_activities,

        crate::api::report::daily_report,
        crate::api::report::dashboard,
        crate::api::report::employee_log
    ),
    components(
        schemas(
            LeaveForm,
            DecisionForm,
            Decision,
            LeaveListResponse,
            LeaveRequest,
            LeaveDates,
            LeaveKind,
            LeaveStatus,
            ActivitySubmission,
            ActivitySlot,
            Activity,
            ActivityReceipt,
            Period,
            DailyReport,
            ReportDay,
            DayKind,
            ReportTotals,
            Dashboard,
            ProductivitySummary,
            UserProductivity,
            OverallProductivity,
            LogDay,
            EmployeeLog,
            MonthQuery,
            DayQuery
        )
    ),
    tags(
        (name = "Leave", description = "Leave requests and reviews"),
        (name = "Activity", description = "Daily activity slots"),
        (name = "Report", description = "Employee daily report"),
        (name = "Manager", description = "Manager dashboard and employee logs"),
    )
)]
pub struct ApiDoc;
