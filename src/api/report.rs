use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use super::MonthQuery;
use crate::auth::actor::Actor;
use crate::engine::{LogDay, Period, Tracker};
use crate::error::TrackerError;

/// A manager's view of one employee's month.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeLog {
    #[schema(example = "asha")]
    pub username: String,
    pub period: Period,
    pub days: Vec<LogDay>,
}

/* =========================
Daily report (employee)
========================= */
#[utoipa::path(
    get,
    path = "/api/report",
    params(MonthQuery),
    responses(
        (status = 200, description = "Leave and activity days of the month with totals", body = DailyReport),
        (status = 400, description = "Invalid month or year"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Report"
)]
pub async fn daily_report(
    actor: Actor,
    tracker: web::Data<Tracker>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    actor.require_employee()?;

    let (month, year) = query.resolve(&tracker);
    let report = tracker.build_report(&actor.username, month, year).await?;
    Ok(HttpResponse::Ok().json(report))
}

/* =========================
Dashboard (manager)
========================= */
#[utoipa::path(
    get,
    path = "/api/manager/dashboard",
    params(MonthQuery),
    responses(
        (status = 200, description = "Per-user and overall productivity plus pending leave count", body = Dashboard),
        (status = 400, description = "Invalid month or year"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Manager"
)]
pub async fn dashboard(
    actor: Actor,
    tracker: web::Data<Tracker>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    actor.require_manager()?;

    let (month, year) = query.resolve(&tracker);
    let dashboard = tracker.dashboard(month, year).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

/* =========================
Employee activity log (manager)
========================= */
#[utoipa::path(
    get,
    path = "/api/manager/employee/{username}",
    params(
        ("username" = String, Path, description = "Employee whose log to show"),
        MonthQuery
    ),
    responses(
        (status = 200, description = "The employee's slots in the month, grouped by date", body = EmployeeLog),
        (status = 400, description = "Invalid month or year"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Manager"
)]
pub async fn employee_log(
    actor: Actor,
    tracker: web::Data<Tracker>,
    path: web::Path<String>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    actor.require_manager()?;

    let username = path.into_inner();
    let (month, year) = query.resolve(&tracker);
    let period = Period::new(month, year).map_err(TrackerError::from)?;
    let days = tracker.monthly_log(&username, month, year).await?;

    Ok(HttpResponse::Ok().json(EmployeeLog {
        username,
        period,
        days,
    }))
}
