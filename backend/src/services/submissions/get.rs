//! # Submission Retrieval
//!
//! Plain reads under `/api/submissions`: one week, one document, and a
//! location's recent history. Live variants of the first two are in
//! `subscribe.rs`.

use crate::error::ApiError;
use crate::services::parse_week;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::HistoryQuery;

/// Submissions shown in the location history panel when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Handler for `GET /api/submissions/week/{week}`.
///
/// # Arguments
/// * `path` - The week ending, `YYYY-MM-DD`.
///
/// # Returns
/// - `200 OK` with every submission of the week, ordered by location code.
/// - `400 Bad Request` if the week ending is malformed.
/// - `503 Service Unavailable` if the store cannot be read.
pub async fn week(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let week = parse_week(&path)?;
    let submissions = state.store.submissions_for_week(week)?;
    Ok(HttpResponse::Ok().json(submissions))
}

/// Handler for `GET /api/submissions/week/{week}/location/{code}`.
///
/// # Returns
/// - `200 OK` with the submission document.
/// - `404 Not Found` if the location has not saved anything for that week yet;
///   the client treats this as an empty form.
/// - `400 Bad Request` / `503 Service Unavailable` as for [`week`].
pub async fn location(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (week, code) = path.into_inner();
    let week = parse_week(&week)?;
    match state.store.get_submission(week, &code)? {
        Some(submission) => Ok(HttpResponse::Ok().json(submission)),
        None => Err(ApiError::NotFound(format!("submission for {} in week {}", code, week))),
    }
}

/// Handler for `GET /api/submissions/location/{code}/history?limit=N`.
///
/// Returns `200 OK` with at most `limit` submissions (default
/// [`DEFAULT_HISTORY_LIMIT`]), newest week first.
pub async fn history(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let submissions = state.store.location_history(&path, limit)?;
    Ok(HttpResponse::Ok().json(submissions))
}

#[cfg(test)]
mod tests {
    use super::super::configure_routes;
    use crate::services::testing::{self, OPEN_WEEK};
    use crate::state::AppState;
    use actix_web::{test, web, App};
    use chrono::{Days, NaiveDate, Utc};
    use common::model::config::Config;
    use common::model::submission::Submission;
    use common::report::audit::apply_save;
    use common::requests::SaveSubmissionRequest;
    use std::collections::BTreeMap;

    fn seed(state: &AppState, week: NaiveDate, code: &str) {
        let request = SaveSubmissionRequest {
            location: None,
            location_code: code.to_string(),
            week_ending: week,
            status: None,
            metrics: BTreeMap::from([("starts".to_string(), serde_json::json!(2))]),
            text_fields: BTreeMap::new(),
        };
        let config = Config::default();
        state
            .store
            .update_submission::<_, crate::error::ApiError>(week, code, |existing| {
                Ok(apply_save(existing, &request, &config, "seed", Utc::now())?)
            })
            .unwrap();
    }

    fn open_week() -> NaiveDate {
        NaiveDate::parse_from_str(OPEN_WEEK, "%Y-%m-%d").unwrap()
    }

    #[actix_web::test]
    async fn week_and_location_reads() {
        let state = testing::state();
        seed(&state, open_week(), "81074");
        seed(&state, open_week(), "30080");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/submissions/week/{}", OPEN_WEEK))
            .to_request();
        let week: Vec<Submission> = test::call_and_read_body_json(&app, req).await;
        let codes: Vec<_> = week.iter().map(|s| s.location_code.as_str()).collect();
        assert_eq!(codes, vec!["30080", "81074"]);

        let req = test::TestRequest::get()
            .uri(&format!("/api/submissions/week/{}/location/30080", OPEN_WEEK))
            .to_request();
        let one: Submission = test::call_and_read_body_json(&app, req).await;
        assert_eq!(one.location, "Granite City");

        let req = test::TestRequest::get()
            .uri(&format!("/api/submissions/week/{}/location/30046", OPEN_WEEK))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }

    #[actix_web::test]
    async fn malformed_week_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(testing::state()))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/submissions/week/next-friday")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn history_defaults_to_ten_newest_weeks() {
        let state = testing::state();
        let first = open_week();
        for n in 0..12 {
            seed(&state, first + Days::new(7 * n), "30080");
        }
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/submissions/location/30080/history")
            .to_request();
        let history: Vec<Submission> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].week_ending, first + Days::new(77));

        let req = test::TestRequest::get()
            .uri("/api/submissions/location/30080/history?limit=2")
            .to_request();
        let history: Vec<Submission> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history.len(), 2);
    }
}
