use sqlx::MySqlPool;
use tracing::info;

// status: 0=pending, 2=approved, 3=rejected, 4=cancelled
const LEAVE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS leave_requests (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(191) NOT NULL,
        leave_type VARCHAR(16) NOT NULL,
        leave_dates VARCHAR(64) NOT NULL,
        status TINYINT UNSIGNED NOT NULL DEFAULT 0,
        requested_on DATETIME NOT NULL,
        reason TEXT NULL,
        INDEX idx_leave_user_status (username, status)
    )
"#;

// clock_in, clock_out and activity_name are free text
const ACTIVITY_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS activities (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(191) NOT NULL,
        activity_date DATE NOT NULL,
        clock_in TEXT NULL,
        activity_name TEXT NOT NULL,
        start_time TIME NOT NULL,
        end_time TIME NOT NULL,
        duration INT NOT NULL,
        clock_out TEXT NULL,
        submitted_at DATETIME NOT NULL,
        INDEX idx_activity_unique (username, activity_date, start_time, end_time),
        INDEX idx_activity_date (activity_date)
    )
"#;

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Creates the tracker tables when they are missing.
pub async fn init_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(LEAVE_TABLE).execute(pool).await?;
    sqlx::query(ACTIVITY_TABLE).execute(pool).await?;

    info!("Database schema ready");
    Ok(())
}
