use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Handler for `GET /api/config`.
///
/// The default document is stored on first access, so this never reports a
/// missing config.
///
/// # Returns
/// - `200 OK` with the config document as JSON.
/// - `503 Service Unavailable` if the store cannot be read or holds an
///   invalid document.
pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let config = state.store.load_config()?;
    Ok(HttpResponse::Ok().json(config))
}

#[cfg(test)]
mod tests {
    use super::super::configure_routes;
    use crate::services::testing;
    use actix_web::{test, web, App};
    use common::model::config::Config;

    #[actix_web::test]
    async fn first_get_returns_defaults() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(testing::state()))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/config").to_request();
        let config: Config = test::call_and_read_body_json(&app, req).await;
        assert_eq!(config.locations.len(), 3);
        assert_eq!(config.settings.auto_save_interval, 60_000);
    }
}
