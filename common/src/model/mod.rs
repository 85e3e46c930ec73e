pub mod config;
pub mod form;
pub mod location;
pub mod submission;
