//! # Week Service
//!
//! `GET /api/weeks/{week}/summary`: totals, net change and how many of the
//! active locations have reported for the week.

mod summary;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/weeks";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{week}/summary", get().to(summary::process))
}
