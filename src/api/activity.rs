use actix_web::{HttpResponse, Responder, web};

use super::DayQuery;
use crate::auth::actor::Actor;
use crate::engine::Tracker;
use crate::error::TrackerError;
use crate::model::ActivitySubmission;
use crate::model::leave_request::parse_date;

/* =========================
Submit a day's activity (employee)
========================= */
/// Replaces any slot with the same date and times.
#[utoipa::path(
    post,
    path = "/api/activity",
    request_body(
        content = ActivitySubmission,
        description = "Clock-in/out and the day's activity slots",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Activities recorded", body = ActivityReceipt),
        (status = 400, description = "Malformed date or time, or end not after start", body = Object, example = json!({
            "message": "End time 09:30 must be after start time 10:00"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Approved leave day, or a future date or time", body = Object, example = json!({
            "message": "You are on approved leave on 2025-06-02. Activity not allowed"
        }))
    ),
    tag = "Activity"
)]
pub async fn submit_activities(
    actor: Actor,
    tracker: web::Data<Tracker>,
    payload: web::Json<ActivitySubmission>,
) -> actix_web::Result<impl Responder> {
    actor.require_employee()?;

    let receipt = tracker
        .submit_activities(&actor.username, &payload)
        .await?;
    Ok(HttpResponse::Created().json(receipt))
}

/* =========================
One day's slots (employee)
========================= */
#[utoipa::path(
    get,
    path = "/api/activity/day",
    params(DayQuery),
    responses(
        (status = 200, description = "The caller's slots on the date, by start time", body = Vec<Activity>),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Activity"
)]
pub async fn day_activities(
    actor: Actor,
    tracker: web::Data<Tracker>,
    query: web::Query<DayQuery>,
) -> actix_web::Result<impl Responder> {
    actor.require_employee()?;

    let date = parse_date(&query.date).map_err(TrackerError::from)?;
    let activities = tracker.day_activities(&actor.username, date).await?;
    Ok(HttpResponse::Ok().json(activities))
}
