//! `PUT /api/config`: replaces the configuration document.
//!
//! The body is validated before anything is written, so an invalid config
//! never reaches the store or the subscribers. Unknown field types are already
//! rejected by the JSON extractor.

use crate::change_feed::FeedEvent;
use crate::error::ApiError;
use crate::services::identity::current_user;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use common::requests::UpdateConfigRequest;
use std::sync::Arc;

pub async fn process(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<UpdateConfigRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut config = body.into_inner().config;
    config.validate()?;

    let user = current_user(&req);
    config.updated_by = Some(user.clone());
    config.updated_at = Some(Utc::now());
    state.store.save_config(&config)?;

    log::info!(
        "configuration updated by {} ({} locations, {} sections)",
        user,
        config.locations.len(),
        config.form_sections.len()
    );
    state
        .feed
        .publish(FeedEvent::ConfigUpdated(Arc::new(config.clone())));
    Ok(HttpResponse::Ok().json(config))
}
