//! JSON handlers over the [`Tracker`](crate::engine::Tracker).

pub mod activity;
pub mod leave_request;
pub mod report;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::engine::Tracker;
use crate::error::TrackerError;

impl ResponseError for TrackerError {
    fn status_code(&self) -> StatusCode {
        match self {
            TrackerError::Validation(_) => StatusCode::BAD_REQUEST,
            TrackerError::Conflict(_) => StatusCode::CONFLICT,
            TrackerError::NotFound { .. } => StatusCode::NOT_FOUND,
            TrackerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            TrackerError::Store(e) => {
                tracing::error!(error = %e, "Record store failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

/// Month filter; either part falls back to the current month.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    /// Month number, 1-12
    #[schema(example = 6)]
    pub month: Option<u32>,
    #[schema(example = 2025)]
    pub year: Option<i32>,
}

impl MonthQuery {
    pub fn resolve(&self, tracker: &Tracker) -> (u32, i32) {
        let current = tracker.current_period();
        (
            self.month.unwrap_or(current.month),
            self.year.unwrap_or(current.year),
        )
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DayQuery {
    /// Date as YYYY-MM-DD
    #[schema(example = "2025-06-02")]
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConflictError, StoreError, ValidationError};
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn errors_map_to_status_and_message() {
        let err = TrackerError::from(ValidationError::InvalidMonth(0));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = TrackerError::from(ConflictError::OnApprovedLeave {
            date: chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value["message"],
            "You are on approved leave on 2025-06-02. Activity not allowed"
        );

        assert_eq!(
            TrackerError::NotFound { id: 3 }.status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn store_details_stay_in_the_log() {
        let err = TrackerError::from(StoreError::Poisoned);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "Internal Server Error");
    }
}
