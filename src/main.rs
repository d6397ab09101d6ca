use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use daily_tracker::clock::SystemClock;
use daily_tracker::config::Config;
use daily_tracker::db::init_db;
use daily_tracker::docs::ApiDoc;
use daily_tracker::engine::Tracker;
use daily_tracker::routes;
use daily_tracker::store::MySqlStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "tracker.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(
        workday_hours = config.policy.nominal_workday_hours,
        zone = %config.policy.time_zone,
        "Server starting..."
    );

    let pool = init_db(&config.database_url)
        .await
        .context("failed to open the database")?;

    let tracker = Data::new(Tracker::new(
        Arc::new(MySqlStore::new(pool)),
        Arc::new(SystemClock::new(config.policy.time_zone)),
        config.policy,
    ));

    let limiter = Arc::new(
        routes::build_limiter(config.rate_protected_per_min)
            .context("invalid rate limit configuration")?,
    );
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(limiter.clone())
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard {_:.*} to match JS/CSS files
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(tracker.clone())
            .configure(|cfg| routes::configure(cfg, &api_prefix))
    })
    .bind(&config.server_addr)?
    .run()
    .await?;

    Ok(())
}
