//! # Export Service
//!
//! Downloads under `/api/export`.
//!
//! - `GET /pdf/{week}`: the weekly KPI report as `KPI_Report_<week>.pdf`.
//! - `GET /snapshot`: every stored submission as `kpi_backup_<date>.json`.
//!
//! Both responses are built completely in memory before anything is sent, so a
//! failed export never produces a truncated file.

mod pdf;
mod report;
mod snapshot;

pub use pdf::ExportError;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/export";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/pdf/{week}", get().to(pdf::process))
        .route("/snapshot", get().to(snapshot::process))
}

fn attachment(filename: String) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(filename)],
    }
}
