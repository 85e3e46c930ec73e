pub mod config_editor;
pub mod dashboard;
pub mod helpers;
pub mod team_form;
