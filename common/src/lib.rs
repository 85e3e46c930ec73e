//! Shared models and domain logic for the weekly KPI reporter.
//!
//! Everything in this crate is free of I/O so it can be compiled both into the
//! actix backend and into the wasm frontend.

pub mod autosave;
pub mod config_editor;
pub mod form;
pub mod formatters;
pub mod model;
pub mod report;
pub mod requests;
pub mod schedule;
