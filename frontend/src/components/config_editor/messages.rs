use common::config_editor::ConfigEdit;
use common::model::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Locations,
    Sections,
    Settings,
}

pub enum Msg {
    SetTab(Tab),
    Edit(ConfigEdit),
    Save,
    Saved(Result<Config, String>),
    /// Drops local edits and goes back to the live config.
    Discard,
}
