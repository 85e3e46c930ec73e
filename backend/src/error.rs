//! Error type returned by every HTTP handler.
//!
//! Bodies are plain text, the way the rest of the API reports failures.

use crate::services::export::ExportError;
use crate::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::model::config::ConfigError;
use common::report::audit::SaveError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Save(#[from] SaveError),
    #[error("invalid week ending '{0}', expected YYYY-MM-DD")]
    InvalidWeek(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("storage unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Config(_) | ApiError::InvalidWeek(_) => StatusCode::BAD_REQUEST,
            ApiError::Save(SaveError::Locked(_)) => StatusCode::CONFLICT,
            ApiError::Save(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("rejected request: {}", self);
        }
        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::model::submission::SubmissionStatus;

    #[test]
    fn status_codes() {
        let week = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let cases = [
            (ApiError::Config(ConfigError::InvalidAutoSaveInterval), 400),
            (ApiError::Save(SaveError::EmptyLocationCode), 400),
            (ApiError::Save(SaveError::Locked(week)), 409),
            (
                ApiError::Save(SaveError::StatusNotAssignable(SubmissionStatus::Locked)),
                400,
            ),
            (ApiError::InvalidWeek("soon".into()), 400),
            (ApiError::NotFound("submission".into()), 404),
            (ApiError::Store(StoreError::Poisoned), 503),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status_code().as_u16(), expected, "{}", error);
        }
    }
}
