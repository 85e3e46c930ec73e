//! Edits the config editor applies to its working copy of the config.
//!
//! Nothing here validates the result as a whole; the server runs
//! [`Config::validate`] when the copy is saved.

use crate::model::config::Config;
use crate::model::form::{FieldType, FormField};
use crate::model::location::Location;

/// Bounds of the rows input for multi-line fields.
pub const MIN_ROWS: u32 = 2;
pub const MAX_ROWS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    Code,
    Name,
    Lead,
    /// Comma separated list.
    Team,
    Note,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Id(String),
    Label(String),
    Type(FieldType),
    Placeholder(String),
    Rows(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsChange {
    AutoSaveInterval(u64),
    DeadlineDay(u8),
    DeadlineTime(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEdit {
    AddLocation,
    UpdateLocation {
        index: usize,
        field: LocationField,
        value: String,
    },
    ToggleLocation(usize),
    RemoveLocation(usize),
    ToggleSection(String),
    RenameSection {
        section: String,
        title: String,
    },
    AddField {
        section: String,
        now_millis: i64,
    },
    UpdateField {
        section: String,
        index: usize,
        change: FieldChange,
    },
    ToggleField {
        section: String,
        index: usize,
    },
    RemoveField {
        section: String,
        index: usize,
    },
    Settings(SettingsChange),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no location at position {0}")]
    NoSuchLocation(usize),
    #[error("no section '{0}'")]
    NoSuchSection(String),
    #[error("section '{section}' has no field at position {index}")]
    NoSuchField { section: String, index: usize },
    #[error("built-in field '{0}' cannot be renamed")]
    BuiltinFieldId(String),
}

impl ConfigEdit {
    pub fn apply(self, config: &mut Config) -> Result<(), EditError> {
        match self {
            ConfigEdit::AddLocation => config.locations.push(Location::blank()),
            ConfigEdit::UpdateLocation {
                index,
                field,
                value,
            } => {
                let location = location_mut(config, index)?;
                match field {
                    LocationField::Code => location.code = value,
                    LocationField::Name => location.name = value,
                    LocationField::Lead => location.lead = value,
                    LocationField::Team => location.team = Location::parse_team(&value),
                    LocationField::Note => {
                        location.note = Some(value).filter(|n| !n.trim().is_empty())
                    }
                }
            }
            ConfigEdit::ToggleLocation(index) => {
                let location = location_mut(config, index)?;
                location.enabled = !location.enabled;
            }
            ConfigEdit::RemoveLocation(index) => {
                location_mut(config, index)?;
                config.locations.remove(index);
            }
            ConfigEdit::ToggleSection(section) => {
                let section = section_mut(config, &section)?;
                section.enabled = !section.enabled;
            }
            ConfigEdit::RenameSection { section, title } => {
                section_mut(config, &section)?.title = title;
            }
            ConfigEdit::AddField {
                section,
                now_millis,
            } => {
                section_mut(config, &section)?
                    .fields
                    .push(FormField::custom(now_millis));
            }
            ConfigEdit::UpdateField {
                section,
                index,
                change,
            } => {
                let field = field_mut(config, &section, index)?;
                match change {
                    FieldChange::Id(id) => {
                        if !field.is_custom() {
                            return Err(EditError::BuiltinFieldId(field.id.clone()));
                        }
                        field.id = id;
                    }
                    FieldChange::Label(label) => field.label = label,
                    FieldChange::Type(field_type) => field.field_type = field_type,
                    FieldChange::Placeholder(p) => field.placeholder = Some(p),
                    FieldChange::Rows(rows) => field.rows = Some(rows.clamp(MIN_ROWS, MAX_ROWS)),
                }
            }
            ConfigEdit::ToggleField { section, index } => {
                let field = field_mut(config, &section, index)?;
                field.enabled = !field.enabled;
            }
            ConfigEdit::RemoveField { section, index } => {
                field_mut(config, &section, index)?;
                section_mut(config, &section)?.fields.remove(index);
            }
            ConfigEdit::Settings(change) => match change {
                SettingsChange::AutoSaveInterval(ms) => config.settings.auto_save_interval = ms,
                SettingsChange::DeadlineDay(day) => config.settings.deadline_day = day,
                SettingsChange::DeadlineTime(time) => config.settings.deadline_time = time,
            },
        }
        Ok(())
    }
}

fn location_mut(config: &mut Config, index: usize) -> Result<&mut Location, EditError> {
    config
        .locations
        .get_mut(index)
        .ok_or(EditError::NoSuchLocation(index))
}

fn section_mut<'a>(
    config: &'a mut Config,
    section: &str,
) -> Result<&'a mut crate::model::form::FormSection, EditError> {
    config
        .form_sections
        .get_mut(section)
        .ok_or_else(|| EditError::NoSuchSection(section.to_string()))
}

fn field_mut<'a>(
    config: &'a mut Config,
    section: &str,
    index: usize,
) -> Result<&'a mut FormField, EditError> {
    section_mut(config, section)?
        .fields
        .get_mut(index)
        .ok_or_else(|| EditError::NoSuchField {
            section: section.to_string(),
            index,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::render_form;
    use pretty_assertions::assert_eq;

    fn section(config: &Config, id: &str) -> Vec<String> {
        config.form_sections[id]
            .fields
            .iter()
            .map(|f| f.id.clone())
            .collect()
    }

    #[test]
    fn location_lifecycle() {
        let mut config = Config::default();
        ConfigEdit::AddLocation.apply(&mut config).unwrap();
        let index = config.locations.len() - 1;
        for (field, value) in [
            (LocationField::Code, "40010"),
            (LocationField::Name, "Alton"),
            (LocationField::Team, "Ana, , Bo "),
            (LocationField::Note, "  "),
        ] {
            ConfigEdit::UpdateLocation {
                index,
                field,
                value: value.into(),
            }
            .apply(&mut config)
            .unwrap();
        }
        let added = &config.locations[index];
        assert_eq!(added.team, vec!["Ana".to_string(), "Bo".to_string()]);
        assert_eq!(added.note, None);
        assert!(config.validate().is_ok());

        ConfigEdit::ToggleLocation(index).apply(&mut config).unwrap();
        assert_eq!(config.active_locations().count(), 3);

        ConfigEdit::RemoveLocation(index).apply(&mut config).unwrap();
        assert_eq!(config.locations.len(), 3);
        assert_eq!(
            ConfigEdit::RemoveLocation(7).apply(&mut config),
            Err(EditError::NoSuchLocation(7))
        );
    }

    #[test]
    fn custom_fields_can_be_renamed_builtin_cannot() {
        let mut config = Config::default();
        ConfigEdit::AddField {
            section: "updates".into(),
            now_millis: 1_736_500_000_000,
        }
        .apply(&mut config)
        .unwrap();
        let index = config.form_sections["updates"].fields.len() - 1;
        assert_eq!(section(&config, "updates")[index], "custom_1736500000000");

        ConfigEdit::UpdateField {
            section: "updates".into(),
            index,
            change: FieldChange::Id("custom_safety".into()),
        }
        .apply(&mut config)
        .unwrap();
        assert!(section(&config, "updates").contains(&"custom_safety".to_string()));

        let renamed = ConfigEdit::UpdateField {
            section: "sales".into(),
            index: 0,
            change: FieldChange::Id("meetings".into()),
        }
        .apply(&mut config);
        assert_eq!(renamed, Err(EditError::BuiltinFieldId("salesMeetings".into())));
    }

    #[test]
    fn disabled_section_and_field_leave_the_form() {
        let mut config = Config::default();
        ConfigEdit::ToggleField {
            section: "branchOperations".into(),
            index: 0,
        }
        .apply(&mut config)
        .unwrap();
        ConfigEdit::ToggleSection("sales".into())
            .apply(&mut config)
            .unwrap();

        let form = render_form(&config);
        assert!(form.field("openOrders").is_none());
        assert!(form.sections.iter().all(|s| s.id != "sales"));
        assert!(config.field("openOrders").is_some());
    }

    #[test]
    fn rows_are_clamped() {
        let mut config = Config::default();
        ConfigEdit::UpdateField {
            section: "updates".into(),
            index: 0,
            change: FieldChange::Rows(40),
        }
        .apply(&mut config)
        .unwrap();
        assert_eq!(config.form_sections["updates"].fields[0].rows, Some(MAX_ROWS));
    }
}
