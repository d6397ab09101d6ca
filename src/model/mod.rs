pub mod activity;
pub mod leave_request;
pub mod role;

pub use activity::{Activity, ActivitySlot, ActivitySubmission, NewActivity};
pub use leave_request::{LeaveDates, LeaveKind, LeaveRequest, LeaveStatus, NewLeaveRequest};
pub use role::Role;
