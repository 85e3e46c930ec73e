//! The editable form derived from the config document.
//!
//! [`render_form`] decides which inputs exist; [`FormValues`] holds what the
//! user typed, keyed by field id. Values for fields the config no longer shows
//! are carried along untouched so saving the form never drops stored data.

use crate::model::config::Config;
use crate::model::form::{FieldType, FormField};
use crate::model::submission::{Submission, coerce_metric, format_number};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Number,
    MultiLine { rows: u32 },
    SingleLine,
}

impl InputKind {
    fn for_field(field: &FormField) -> Self {
        match field.field_type {
            FieldType::Number => InputKind::Number,
            FieldType::Textarea => InputKind::MultiLine {
                rows: field.rows.unwrap_or(3),
            },
            FieldType::Text => InputKind::SingleLine,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub placeholder: String,
    pub input: InputKind,
}

impl FieldView {
    pub fn is_metric(&self) -> bool {
        self.input == InputKind::Number
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormView {
    pub sections: Vec<SectionView>,
}

impl FormView {
    pub fn fields(&self) -> impl Iterator<Item = &FieldView> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&FieldView> {
        self.fields().find(|f| f.id == id)
    }
}

/// Enabled sections in stored order, each with its enabled fields in stored order.
pub fn render_form(config: &Config) -> FormView {
    let sections = config
        .enabled_sections()
        .map(|(id, section)| SectionView {
            id: id.clone(),
            title: section.title.clone(),
            fields: section
                .enabled_fields()
                .map(|field| FieldView {
                    id: field.id.clone(),
                    label: field.label.clone(),
                    placeholder: field.placeholder.clone().unwrap_or_default(),
                    input: InputKind::for_field(field),
                })
                .collect(),
        })
        .collect();
    FormView { sections }
}

/// Raw form state as typed by the user.
///
/// Serialization order is stable (sorted maps) so two equal states always
/// produce the same fingerprint in the auto-save controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormValues {
    pub metrics: BTreeMap<String, String>,
    pub text_fields: BTreeMap<String, String>,
}

impl FormValues {
    /// Seeds the form from a stored document, or empty when there is none.
    pub fn from_submission(submission: Option<&Submission>) -> Self {
        let Some(submission) = submission else {
            return Self::default();
        };
        Self {
            metrics: submission
                .metrics
                .iter()
                .map(|(k, v)| (k.clone(), format_number(*v)))
                .collect(),
            text_fields: submission.text_fields.clone(),
        }
    }

    pub fn get(&self, field: &FieldView) -> &str {
        let map = if field.is_metric() { &self.metrics } else { &self.text_fields };
        map.get(&field.id).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: &FieldView, value: String) {
        let map = if field.is_metric() { &mut self.metrics } else { &mut self.text_fields };
        map.insert(field.id.clone(), value);
    }

    /// Metric map as it will be persisted: every visible metric field plus any
    /// hidden value already held, coerced to numbers.
    pub fn metrics_payload(&self, form: &FormView) -> BTreeMap<String, serde_json::Value> {
        let mut out: BTreeMap<String, serde_json::Value> = self
            .metrics
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        for field in form.fields().filter(|f| f.is_metric()) {
            out.entry(field.id.clone())
                .or_insert_with(|| serde_json::Value::String(String::new()));
        }
        out.into_iter()
            .map(|(k, v)| {
                let n = coerce_metric(&v);
                (k, serde_json::json!(n))
            })
            .collect()
    }

    /// Text map as it will be persisted, with every visible text field present.
    pub fn text_payload(&self, form: &FormView) -> BTreeMap<String, String> {
        let mut out = self.text_fields.clone();
        for field in form.fields().filter(|f| !f.is_metric()) {
            out.entry(field.id.clone()).or_default();
        }
        out
    }

    pub fn net_change(&self) -> f64 {
        let read = |id: &str| {
            self.metrics
                .get(id)
                .map(|v| coerce_metric(&serde_json::Value::String(v.clone())))
                .unwrap_or(0.0)
        };
        read("starts") - read("ends")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn stored() -> Submission {
        Submission {
            id: "2025-01-10_30080".into(),
            location: "Granite City".into(),
            location_code: "30080".into(),
            week_ending: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            status: Default::default(),
            metrics: [("starts".to_string(), 4.0), ("salesMeetings".to_string(), 2.0)]
                .into_iter()
                .collect(),
            text_fields: [("wins".to_string(), "Signed Acme".to_string())]
                .into_iter()
                .collect(),
            last_updated_by: String::new(),
            last_updated_at: None,
            update_history: Vec::new(),
        }
    }

    #[test]
    fn default_config_renders_all_sections_in_order() {
        let form = render_form(&Config::default());
        let titles: Vec<_> = form.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Branch Operations", "Sales", "Updates"]);
        assert_eq!(form.field("starts").unwrap().input, InputKind::Number);
        assert_eq!(
            form.field("notes").unwrap().input,
            InputKind::MultiLine { rows: 2 }
        );
    }

    #[test]
    fn text_fields_render_single_line() {
        let mut config = Config::default();
        let mut custom = FormField::custom(1);
        custom.label = "Referral source".into();
        config.form_sections["updates"].fields.push(custom);
        let form = render_form(&config);
        assert_eq!(form.field("custom_1").unwrap().input, InputKind::SingleLine);
    }

    #[test]
    fn disabled_field_is_hidden_but_stored_value_survives() {
        let mut config = Config::default();
        config.form_sections["sales"].fields[0].enabled = false;
        let form = render_form(&config);
        assert!(form.field("salesMeetings").is_none());

        let submission = stored();
        let values = FormValues::from_submission(Some(&submission));
        let metrics = values.metrics_payload(&form);
        assert_eq!(metrics["salesMeetings"], serde_json::json!(2.0));
        assert_eq!(submission.metric("salesMeetings"), 2.0);
    }

    #[test]
    fn disabled_section_hides_all_its_fields() {
        let mut config = Config::default();
        config.form_sections["updates"].enabled = false;
        let form = render_form(&config);
        assert_eq!(form.sections.len(), 2);
        assert!(form.field("goals").is_none());
    }

    #[test]
    fn payload_fills_visible_fields_and_coerces() {
        let form = render_form(&Config::default());
        let mut values = FormValues::default();
        values.set(form.field("starts").unwrap(), "5".into());
        values.set(form.field("ends").unwrap(), "two".into());
        values.set(form.field("wins").unwrap(), "Big win".into());

        let metrics = values.metrics_payload(&form);
        assert_eq!(metrics["starts"], serde_json::json!(5.0));
        assert_eq!(metrics["ends"], serde_json::json!(0.0));
        assert_eq!(metrics["openOrders"], serde_json::json!(0.0));
        let text = values.text_payload(&form);
        assert_eq!(text["wins"], "Big win");
        assert_eq!(text["notes"], "");
        assert_eq!(values.net_change(), 5.0);
    }
}
