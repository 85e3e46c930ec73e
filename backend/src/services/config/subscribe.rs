use crate::change_feed::sse::{event_stream, respond, Delivery};
use crate::change_feed::FeedEvent;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Streams the config now and again after every update.
pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rx = state.feed.subscribe();
    let initial = state.store.load_config()?;
    let store = state.store.clone();

    let events = event_stream("config", initial, rx, move |delivery| match delivery {
        Delivery::Event(FeedEvent::ConfigUpdated(config)) => Some(config.as_ref().clone()),
        Delivery::Event(_) => None,
        Delivery::Lagged => store
            .load_config()
            .map_err(|e| log::warn!("config resync failed: {}", e))
            .ok(),
    });
    Ok(respond(events))
}

#[cfg(test)]
mod tests {
    use super::super::configure_routes;
    use crate::services::testing;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn opens_event_stream_with_current_config() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(testing::state()))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/config/subscribe")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/event-stream"
        );

        let frame = testing::first_chunk(resp).await;
        assert!(frame.starts_with("data: {"));
        assert!(frame.contains("\"formSections\""));
    }
}
