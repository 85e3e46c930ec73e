//! Live reads of submissions over Server-Sent Events.
//!
//! Each frame carries the full current value of the read: the week's list, or
//! the single document (`null` while it does not exist yet).

use crate::change_feed::sse::{event_stream, respond, Delivery};
use crate::change_feed::FeedEvent;
use crate::error::ApiError;
use crate::services::parse_week;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn week(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let week = parse_week(&path)?;
    let rx = state.feed.subscribe();
    let initial = state.store.submissions_for_week(week)?;
    let store = state.store.clone();

    let events = event_stream(format!("week {}", week), initial, rx, move |delivery| {
        let relevant = match &delivery {
            Delivery::Event(FeedEvent::SubmissionSaved(s)) => s.week_ending == week,
            Delivery::Event(_) => false,
            Delivery::Lagged => true,
        };
        if !relevant {
            return None;
        }
        store
            .submissions_for_week(week)
            .map_err(|e| log::warn!("week {} refresh failed: {}", week, e))
            .ok()
    });
    Ok(respond(events))
}

pub async fn location(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (week, code) = path.into_inner();
    let week = parse_week(&week)?;
    let rx = state.feed.subscribe();
    let initial = state.store.get_submission(week, &code)?;
    let store = state.store.clone();
    let label = format!("week {} location {}", week, code);

    let events = event_stream(label, initial, rx, move |delivery| match delivery {
        Delivery::Event(FeedEvent::SubmissionSaved(s))
            if s.week_ending == week && s.location_code == code =>
        {
            Some(Some(s.as_ref().clone()))
        }
        Delivery::Event(_) => None,
        Delivery::Lagged => store
            .get_submission(week, &code)
            .map_err(|e| log::warn!("submission {}/{} refresh failed: {}", week, code, e))
            .ok(),
    });
    Ok(respond(events))
}
