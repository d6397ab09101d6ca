use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::actor::Actor;
use crate::engine::{Decision, Tracker};
use crate::error::{TrackerError, ValidationError};
use crate::model::leave_request::parse_date;
use crate::model::{LeaveDates, LeaveKind, LeaveRequest};

/// Leave form as posted by an employee: one date for `single`, a from/to
/// pair for `multiple`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveForm {
    #[schema(example = "multiple")]
    pub leave_type: LeaveKind,
    #[schema(example = "2025-06-01", nullable = true)]
    pub single_date: Option<String>,
    #[schema(example = "2025-06-01", nullable = true)]
    pub from_date: Option<String>,
    #[schema(example = "2025-06-03", nullable = true)]
    pub to_date: Option<String>,
    #[schema(example = "Family function", nullable = true)]
    pub reason: Option<String>,
}

impl LeaveForm {
    pub fn dates(&self) -> Result<LeaveDates, ValidationError> {
        fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ValidationError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ValidationError::InvalidLeaveDates(format!("{field} is required")))
        }

        match self.leave_type {
            LeaveKind::Single => Ok(LeaveDates::single(parse_date(required(
                &self.single_date,
                "single_date",
            )?)?)),
            LeaveKind::Multiple => LeaveDates::range(
                parse_date(required(&self.from_date, "from_date")?)?,
                parse_date(required(&self.to_date, "to_date")?)?,
            ),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionForm {
    #[schema(example = "approve")]
    pub decision: Decision,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub total: usize,
}

impl From<Vec<LeaveRequest>> for LeaveListResponse {
    fn from(data: Vec<LeaveRequest>) -> Self {
        Self {
            total: data.len(),
            data,
        }
    }
}

/* =========================
Submit leave (employee)
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = LeaveForm,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted, pending review", body = LeaveRequest),
        (status = 400, description = "Malformed or backwards dates", body = Object, example = json!({
            "message": "To date 2025-06-01 cannot be before from date 2025-06-03"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Dates overlap a pending or approved request", body = Object, example = json!({
            "message": "You already applied leave for these date(s): 2025-06-02"
        }))
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    actor: Actor,
    tracker: web::Data<Tracker>,
    payload: web::Json<LeaveForm>,
) -> actix_web::Result<impl Responder> {
    actor.require_employee()?;

    let form = payload.into_inner();
    let dates = form.dates().map_err(TrackerError::from)?;
    let leave = tracker
        .submit_leave(&actor.username, dates, form.reason)
        .await?;

    Ok(HttpResponse::Created().json(leave))
}

/* =========================
Own leave history (employee)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave",
    responses(
        (status = 200, description = "The caller's requests, newest first", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Leave"
)]
pub async fn leave_history(
    actor: Actor,
    tracker: web::Data<Tracker>,
) -> actix_web::Result<impl Responder> {
    actor.require_employee()?;

    let leaves = tracker.leave_history(&actor.username).await?;
    Ok(HttpResponse::Ok().json(LeaveListResponse::from(leaves)))
}

/* =========================
Cancel own leave (employee)
========================= */
#[utoipa::path(
    post,
    path = "/api/leave/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave cancelled", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No such request for this user", body = Object, example = json!({
            "message": "Leave request 7 not found"
        })),
        (status = 409, description = "Request already rejected or cancelled")
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    actor: Actor,
    tracker: web::Data<Tracker>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    actor.require_employee()?;

    let leave = tracker
        .cancel_leave(&actor.username, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Pending leave (manager)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave/pending",
    responses(
        (status = 200, description = "Requests awaiting review, oldest first", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Leave"
)]
pub async fn pending_leaves(
    actor: Actor,
    tracker: web::Data<Tracker>,
) -> actix_web::Result<impl Responder> {
    actor.require_manager()?;

    let leaves = tracker.pending_leaves().await?;
    Ok(HttpResponse::Ok().json(LeaveListResponse::from(leaves)))
}

/* =========================
Approve / reject (manager)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/decision",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to decide")
    ),
    request_body(content = DecisionForm, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave approved or rejected", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed", body = Object, example = json!({
            "message": "Leave request 7 is approved and cannot become rejected"
        }))
    ),
    tag = "Leave"
)]
pub async fn decide_leave(
    actor: Actor,
    tracker: web::Data<Tracker>,
    path: web::Path<u64>,
    payload: web::Json<DecisionForm>,
) -> actix_web::Result<impl Responder> {
    actor.require_manager()?;

    let leave = tracker
        .decide_leave(path.into_inner(), payload.decision)
        .await?;
    Ok(HttpResponse::Ok().json(leave))
}
