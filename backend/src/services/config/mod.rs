//! # Config Service
//!
//! Routes under `/api/config` for the singleton configuration document.
//!
//! - `GET /`: current config, created with defaults on first access.
//! - `PUT /`: validates and replaces the config, then notifies subscribers.
//! - `GET /subscribe`: Server-Sent Events stream of config snapshots.

mod get;
mod subscribe;
mod update;

use actix_web::web::{get, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/config";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::process))
        .route("", put().to(update::process))
        .route("/subscribe", get().to(subscribe::process))
}
