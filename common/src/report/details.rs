//! Per-location detail rows shared by the dashboard cards and the PDF report.

use crate::model::config::Config;
use crate::model::submission::Submission;
use std::collections::BTreeSet;

/// Enabled metric fields in form order as `(label, value)`; missing values are 0.
pub fn metric_entries(config: &Config, submission: &Submission) -> Vec<(String, f64)> {
    config
        .enabled_sections()
        .flat_map(|(_, section)| section.enabled_fields())
        .filter(|field| field.field_type.is_metric())
        .map(|field| (field.label.clone(), submission.metric(&field.id)))
        .collect()
}

/// Non-blank text fields as `(label, text)`: config order first, then any
/// stored keys the config no longer defines.
pub fn text_entries(config: &Config, submission: &Submission) -> Vec<(String, String)> {
    let mut seen = BTreeSet::new();
    let mut entries = Vec::new();
    for field in config.form_sections.values().flat_map(|s| s.fields.iter()) {
        if field.field_type.is_metric() || !seen.insert(field.id.as_str()) {
            continue;
        }
        if let Some(text) = submission.text(&field.id) {
            entries.push((field.label.clone(), text.to_string()));
        }
    }
    for id in submission.text_fields.keys() {
        if seen.contains(id.as_str()) {
            continue;
        }
        if let Some(text) = submission.text(id) {
            entries.push((config.field_label(id), text.to_string()));
        }
    }
    entries
}
