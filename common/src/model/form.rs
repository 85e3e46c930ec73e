use serde::{Deserialize, Serialize};

/// Prefix carried by every field added from the config editor.
pub const CUSTOM_FIELD_PREFIX: &str = "custom_";

/// Input kind of a form field.
///
/// Deserialization is strict: a config document naming any other type is
/// rejected instead of silently falling back to a text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
}

impl FieldType {
    pub const ALL: [FieldType; 3] = [FieldType::Text, FieldType::Textarea, FieldType::Number];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Whether values of this field live in `metrics` rather than `textFields`.
    pub fn is_metric(&self) -> bool {
        matches!(self, FieldType::Number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl FormField {
    pub(crate) fn builtin(
        id: &str,
        label: &str,
        field_type: FieldType,
        placeholder: &str,
        rows: Option<u32>,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            field_type,
            placeholder: Some(placeholder.to_string()),
            rows,
            enabled: true,
        }
    }

    /// A new user-defined text field. `now_millis` makes the id unique.
    pub fn custom(now_millis: i64) -> Self {
        Self {
            id: format!("{}{}", CUSTOM_FIELD_PREFIX, now_millis),
            label: String::new(),
            field_type: FieldType::Text,
            placeholder: Some(String::new()),
            rows: None,
            enabled: true,
        }
    }

    /// Built-in fields keep their ids; only custom ones may be renamed.
    pub fn is_custom(&self) -> bool {
        self.id.starts_with(CUSTOM_FIELD_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    pub title: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl FormSection {
    pub fn enabled_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| f.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_type_is_rejected() {
        let raw = r#"{"id":"x","label":"X","type":"checkbox"}"#;
        assert!(serde_json::from_str::<FormField>(raw).is_err());
    }

    #[test]
    fn field_round_trips_with_type_key() {
        let raw = r#"{"id":"wins","label":"Wins","type":"textarea","rows":3}"#;
        let field: FormField = serde_json::from_str(raw).unwrap();
        assert_eq!(field.field_type, FieldType::Textarea);
        assert_eq!(field.rows, Some(3));
        assert!(field.enabled);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "textarea");
    }

    #[test]
    fn custom_fields_are_marked() {
        let field = FormField::custom(1_736_500_000_000);
        assert_eq!(field.id, "custom_1736500000000");
        assert!(field.is_custom());
        assert!(!FormField::builtin("starts", "Starts", FieldType::Number, "", None).is_custom());
    }
}
