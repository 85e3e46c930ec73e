use crate::error::ApiError;
use crate::services::parse_week;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::report::aggregate::WeekSummary;

/// Handler for `GET /api/weeks/{week}/summary`.
///
/// Totals every metric across the week's submissions and counts how many
/// active locations have reported.
///
/// # Arguments
/// * `path` - The week ending, `YYYY-MM-DD`.
///
/// # Returns
/// - `200 OK` with a `WeekSummary` JSON payload.
/// - `400 Bad Request` if the week ending is malformed.
/// - `503 Service Unavailable` if the store cannot be read.
pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let week = parse_week(&path)?;
    let config = state.store.load_config()?;
    let submissions = state.store.submissions_for_week(week)?;
    Ok(HttpResponse::Ok().json(WeekSummary::build(week, &config, &submissions)))
}
