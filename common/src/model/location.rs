use serde::{Deserialize, Serialize};

/// A branch that reports weekly metrics. Identified by `code`.
///
/// Locations are only created or edited through the config document.
/// Disabling one (`enabled = false`) hides it from the form and the dashboard
/// without touching any submission already stored under its code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub lead: String,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Location {
    /// Blank entry appended by the config editor.
    pub fn blank() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            lead: String::new(),
            team: Vec::new(),
            note: None,
            enabled: true,
        }
    }

    /// `"Granite City (30080)"`, used in selects and report headings.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }

    /// Parses the comma separated team list typed in the config editor.
    pub fn parse_team(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Resolves a location's name from its code, falling back to the code itself.
pub fn location_name(locations: &[Location], code: &str) -> String {
    locations
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.name.clone())
        .unwrap_or_else(|| code.to_string())
}
