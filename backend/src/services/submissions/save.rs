//! `POST /api/submissions`: the only write path for submission documents.
//!
//! 1. The week's lock deadline is checked against the current config.
//! 2. Inside one store transaction the stored document is read, diffed against
//!    the request and written back with the new change records.
//! 3. The saved document is published to the change feed.

use crate::change_feed::FeedEvent;
use crate::error::ApiError;
use crate::services::identity::current_user;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use common::model::submission::SubmissionStatus;
use common::report::audit::{apply_save, SaveError};
use common::requests::{SaveSubmissionRequest, SaveSubmissionResponse};
use std::sync::Arc;

pub async fn process(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SaveSubmissionRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    let user = current_user(&req);
    let now = Utc::now();
    let week = request.week_ending;

    let config = state.store.load_config()?;
    if state.lock_rule(&config)?.is_locked(week, now) {
        return Err(SaveError::Locked(week).into());
    }

    let code = request.location_code.trim().to_string();
    let (submission, changes) = state
        .store
        .update_submission(week, &code, |existing| {
            if existing.is_some_and(|s| s.status == SubmissionStatus::Locked) {
                return Err(ApiError::from(SaveError::Locked(week)));
            }
            Ok(apply_save(existing, &request, &config, &user, now)?)
        })?;

    log::info!(
        "saved {} by {} ({} changes, status {})",
        submission.id,
        user,
        changes,
        submission.status
    );
    state
        .feed
        .publish(FeedEvent::SubmissionSaved(Arc::new(submission.clone())));

    Ok(HttpResponse::Ok().json(SaveSubmissionResponse {
        id: submission.id.clone(),
        changes,
        submission,
    }))
}
