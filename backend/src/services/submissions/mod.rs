//! # Submission Service
//!
//! Routes under `/api/submissions`. One document exists per week ending and
//! location; saving creates it on first use and diffs it afterwards.
//!
//! - `POST /`: save with audit diff. Rejected with 409 once the week is locked.
//! - `GET /week/{week}`: all submissions of a week.
//! - `GET /week/{week}/location/{code}`: one submission, 404 when none exists.
//! - `GET /week/{week}/subscribe` and `GET /week/{week}/location/{code}/subscribe`:
//!   Server-Sent Events streams of the same reads.
//! - `GET /location/{code}/history?limit=N`: newest weeks first.

mod get;
mod save;
mod subscribe;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/submissions";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(save::process))
        .route("/week/{week}", get().to(get::week))
        .route("/week/{week}/subscribe", get().to(subscribe::week))
        .route("/week/{week}/location/{code}", get().to(get::location))
        .route(
            "/week/{week}/location/{code}/subscribe",
            get().to(subscribe::location),
        )
        .route("/location/{code}/history", get().to(get::history))
}
