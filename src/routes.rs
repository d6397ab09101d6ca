use crate::api::{activity, leave_request, report};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    cfg.service(
        web::scope(api_prefix)
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_history))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/pending
                    .service(
                        web::resource("/pending").route(web::get().to(leave_request::pending_leaves)),
                    )
                    // /leave/{id}/cancel
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::post().to(leave_request::cancel_leave)),
                    )
                    // /leave/{id}/decision
                    .service(
                        web::resource("/{id}/decision")
                            .route(web::put().to(leave_request::decide_leave)),
                    ),
            )
            .service(
                web::scope("/activity")
                    // /activity
                    .service(web::resource("").route(web::post().to(activity::submit_activities)))
                    // /activity/day?date=
                    .service(web::resource("/day").route(web::get().to(activity::day_activities))),
            )
            .service(web::resource("/report").route(web::get().to(report::daily_report)))
            .service(
                web::scope("/manager")
                    .service(web::resource("/dashboard").route(web::get().to(report::dashboard)))
                    .service(
                        web::resource("/employee/{username}")
                            .route(web::get().to(report::employee_log)),
                    ),
            ),
    );
}
