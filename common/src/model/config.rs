//! The singleton configuration document.
//!
//! The config drives which locations may report and which fields the team
//! member form shows. It is created with [`Config::default`] the first time
//! it is read and afterwards only replaced wholesale by the config editor.
//! [`Config::validate`] runs on every load and every update so a malformed
//! document never reaches the form renderer.

use crate::model::form::{FieldType, FormField, FormSection};
use crate::model::location::Location;
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

static LOCATION_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("location #{0} has an empty code")]
    EmptyLocationCode(usize),
    #[error("location code '{0}' may only contain letters, digits, '-' and '_'")]
    InvalidLocationCode(String),
    #[error("location code '{0}' is used more than once")]
    DuplicateLocation(String),
    #[error("section '{section}' defines field '{field}' more than once")]
    DuplicateField { section: String, field: String },
    #[error("section '{0}' has a field with an empty id")]
    EmptyFieldId(String),
    #[error("deadline day must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidDeadlineDay(u8),
    #[error("deadline time '{0}' is not in HH:MM format")]
    InvalidDeadlineTime(String),
    #[error("auto-save interval must be greater than zero")]
    InvalidAutoSaveInterval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Debounce delay of the team member form, in milliseconds.
    pub auto_save_interval: u64,
    /// 0 = Sunday ... 6 = Saturday.
    pub deadline_day: u8,
    /// Local wall-clock time, `HH:MM`.
    pub deadline_time: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_save_interval: 60_000,
            deadline_day: 5,
            deadline_time: "17:00".to_string(),
        }
    }
}

impl Settings {
    pub fn deadline_weekday(&self) -> Result<Weekday, ConfigError> {
        match self.deadline_day {
            0 => Ok(Weekday::Sun),
            1 => Ok(Weekday::Mon),
            2 => Ok(Weekday::Tue),
            3 => Ok(Weekday::Wed),
            4 => Ok(Weekday::Thu),
            5 => Ok(Weekday::Fri),
            6 => Ok(Weekday::Sat),
            other => Err(ConfigError::InvalidDeadlineDay(other)),
        }
    }

    pub fn deadline_clock(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(self.deadline_time.trim(), "%H:%M")
            .map_err(|_| ConfigError::InvalidDeadlineTime(self.deadline_time.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Keyed by section id. Key order is the render order.
    #[serde(default)]
    pub form_sections: IndexMap<String, FormSection>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Config {
    /// Parses and validates a stored or submitted config document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigLoadError> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut codes = HashSet::new();
        for (idx, location) in self.locations.iter().enumerate() {
            let code = location.code.trim();
            if code.is_empty() {
                return Err(ConfigError::EmptyLocationCode(idx + 1));
            }
            if !LOCATION_CODE_RE.is_match(code) {
                return Err(ConfigError::InvalidLocationCode(code.to_string()));
            }
            if !codes.insert(code) {
                return Err(ConfigError::DuplicateLocation(code.to_string()));
            }
        }

        for (section_id, section) in &self.form_sections {
            let mut ids = HashSet::new();
            for field in &section.fields {
                if field.id.trim().is_empty() {
                    return Err(ConfigError::EmptyFieldId(section_id.clone()));
                }
                if !ids.insert(field.id.as_str()) {
                    return Err(ConfigError::DuplicateField {
                        section: section_id.clone(),
                        field: field.id.clone(),
                    });
                }
            }
        }

        self.settings.deadline_weekday()?;
        self.settings.deadline_clock()?;
        if self.settings.auto_save_interval == 0 {
            return Err(ConfigError::InvalidAutoSaveInterval);
        }
        Ok(())
    }

    pub fn active_locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter().filter(|l| l.enabled)
    }

    pub fn location(&self, code: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.code == code)
    }

    /// Enabled sections in stored order, paired with their ids.
    pub fn enabled_sections(&self) -> impl Iterator<Item = (&String, &FormSection)> {
        self.form_sections.iter().filter(|(_, s)| s.enabled)
    }

    pub fn enabled_fields(&self, section_id: &str) -> Vec<&FormField> {
        match self.form_sections.get(section_id) {
            Some(section) if section.enabled => section.enabled_fields().collect(),
            _ => Vec::new(),
        }
    }

    /// Looks a field up across all sections, enabled or not.
    pub fn field(&self, field_id: &str) -> Option<&FormField> {
        self.form_sections
            .values()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.id == field_id)
    }

    pub fn field_label(&self, field_id: &str) -> String {
        self.field(field_id)
            .map(|f| f.label.clone())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| field_id.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("malformed config document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl Default for Config {
    fn default() -> Self {
        let locations = vec![
            Location {
                code: "30080".into(),
                name: "Granite City".into(),
                lead: "Jae".into(),
                team: vec!["Zire".into(), "Greg".into(), "Shantez".into()],
                note: None,
                enabled: true,
            },
            Location {
                code: "81074".into(),
                name: "Peoria".into(),
                lead: "Marcia/Ronda".into(),
                team: vec!["Ronda".into()],
                note: None,
                enabled: true,
            },
            Location {
                code: "30046".into(),
                name: "Litchfield".into(),
                lead: "Kevin".into(),
                team: vec!["Kevin".into()],
                note: Some("On-Site at Dometic".into()),
                enabled: true,
            },
        ];

        let mut form_sections = IndexMap::new();
        form_sections.insert(
            "branchOperations".to_string(),
            FormSection {
                title: "Branch Operations".into(),
                enabled: true,
                fields: vec![
                    FormField::builtin("openOrders", "Current Open Orders", FieldType::Number, "e.g., 15", None),
                    FormField::builtin(
                        "candidatesInterviewed",
                        "Candidates Sent to Interviews",
                        FieldType::Number,
                        "Cumulative for the week",
                        None,
                    ),
                    FormField::builtin("starts", "Assignment Starts", FieldType::Number, "Cumulative for the week", None),
                    FormField::builtin("ends", "Assignment Ends", FieldType::Number, "Cumulative for the week", None),
                ],
            },
        );
        form_sections.insert(
            "sales".to_string(),
            FormSection {
                title: "Sales".into(),
                enabled: true,
                fields: vec![
                    FormField::builtin(
                        "salesMeetings",
                        "Client Meetings / Site Visits",
                        FieldType::Number,
                        "Count for the week",
                        None,
                    ),
                    FormField::builtin(
                        "marketingComms",
                        "Skill Marketing Communications Sent",
                        FieldType::Number,
                        "Count for the week",
                        None,
                    ),
                    FormField::builtin(
                        "wins",
                        "Wins This Week",
                        FieldType::Textarea,
                        "New accounts, renewals, order increases, positive feedback...",
                        Some(3),
                    ),
                    FormField::builtin(
                        "salesPlan",
                        "Sales Plan for Next Week",
                        FieldType::Textarea,
                        "Specific targets, prospects, meetings scheduled...",
                        Some(3),
                    ),
                ],
            },
        );
        form_sections.insert(
            "updates".to_string(),
            FormSection {
                title: "Updates".into(),
                enabled: true,
                fields: vec![
                    FormField::builtin(
                        "goals",
                        "Branch Goals/Targets",
                        FieldType::Textarea,
                        "Team objectives and key targets...",
                        Some(3),
                    ),
                    FormField::builtin(
                        "challenges",
                        "Current Challenges",
                        FieldType::Textarea,
                        "Obstacles, concerns, areas needing support...",
                        Some(3),
                    ),
                    FormField::builtin(
                        "notes",
                        "Additional Notes",
                        FieldType::Textarea,
                        "Any other relevant information...",
                        Some(2),
                    ),
                ],
            },
        );

        Self {
            locations,
            form_sections,
            settings: Settings::default(),
            updated_by: None,
            updated_at: None,
        }
    }
}
