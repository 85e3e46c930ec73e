use super::attachment;
use super::ExportError;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};

pub fn filename(date: NaiveDate) -> String {
    format!("kpi_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Every stored submission as a pretty-printed JSON array.
pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let submissions = state.store.all_submissions()?;
    let body = serde_json::to_vec_pretty(&submissions).map_err(ExportError::from)?;
    log::info!("exported snapshot of {} submissions", submissions.len());

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(attachment(filename(Utc::now().date_naive())))
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::export::configure_routes;
    use crate::services::testing;
    use actix_web::test::{call_service, init_service, TestRequest};
    use actix_web::App;
    use common::model::submission::Submission;

    #[test]
    fn backup_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(filename(date), "kpi_backup_2025-01-10.json");
    }

    #[actix_web::test]
    async fn empty_store_exports_empty_array() {
        let app = init_service(
            App::new()
                .app_data(web::Data::new(testing::state()))
                .service(configure_routes()),
        )
        .await;

        let req = TestRequest::get()
            .uri("/api/export/snapshot")
            .to_request();
        let resp = call_service(&app, req).await;
        assert!(resp.status().is_success());
        let disposition = resp
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("kpi_backup_"));

        let body: Vec<Submission> = serde_json::from_str(&testing::body_text(resp).await).unwrap();
        assert!(body.is_empty());
    }
}
