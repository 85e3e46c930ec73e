//! Applies a save request to the stored submission, recording a field-level
//! audit trail.
//!
//! Metrics and text fields are replaced wholesale by the incoming maps. Every
//! key whose value differs between the stored and incoming document, including
//! keys present on only one side, yields one [`Change`]. Nothing is recorded
//! when the document is first created.

use crate::model::config::Config;
use crate::model::location::location_name;
use crate::model::submission::{
    Change, FieldValue, HISTORY_LIMIT, Submission, SubmissionStatus, submission_id,
};
use crate::requests::SaveSubmissionRequest;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("location code must not be empty")]
    EmptyLocationCode,
    #[error("unknown location '{0}'")]
    UnknownLocation(String),
    #[error("the submission for week ending {0} is locked and cannot be edited")]
    Locked(NaiveDate),
    /// Locking follows the deadline; clients may only draft or submit.
    #[error("status '{0}' cannot be set by a save")]
    StatusNotAssignable(SubmissionStatus),
}

/// Field-by-field diff of two metric/text snapshots.
pub fn diff(
    existing: &Submission,
    metrics: &BTreeMap<String, f64>,
    text_fields: &BTreeMap<String, String>,
    updated_by: &str,
    at: DateTime<Utc>,
) -> Vec<Change> {
    let mut changes = diff_map("metrics", &existing.metrics, metrics, updated_by, at, |v| {
        FieldValue::Number(*v)
    });
    changes.extend(diff_map(
        "textFields",
        &existing.text_fields,
        text_fields,
        updated_by,
        at,
        |v| FieldValue::Text(v.clone()),
    ));
    changes
}

fn diff_map<V: PartialEq>(
    prefix: &str,
    old: &BTreeMap<String, V>,
    new: &BTreeMap<String, V>,
    updated_by: &str,
    at: DateTime<Utc>,
    to_value: impl Fn(&V) -> FieldValue,
) -> Vec<Change> {
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    keys.into_iter()
        .filter_map(|key| {
            let before = old.get(key);
            let after = new.get(key);
            if before == after {
                return None;
            }
            Some(Change {
                timestamp: at,
                field: format!("{prefix}.{key}"),
                old_value: before.map(&to_value),
                new_value: after.map(&to_value),
                updated_by: updated_by.to_string(),
            })
        })
        .collect()
}

/// Builds the document to persist for `request`, given whatever is stored.
///
/// Returns the new document and the number of change records appended.
pub fn apply_save(
    existing: Option<&Submission>,
    request: &SaveSubmissionRequest,
    config: &Config,
    updated_by: &str,
    now: DateTime<Utc>,
) -> Result<(Submission, usize), SaveError> {
    let code = request.location_code.trim();
    if code.is_empty() {
        return Err(SaveError::EmptyLocationCode);
    }
    if request.status == Some(SubmissionStatus::Locked) {
        return Err(SaveError::StatusNotAssignable(SubmissionStatus::Locked));
    }
    if config.location(code).is_none() && existing.is_none() {
        return Err(SaveError::UnknownLocation(code.to_string()));
    }

    let metrics = request.coerced_metrics();
    let text_fields = request.text_fields.clone();

    let (changes, mut history, stored_status) = match existing {
        Some(prev) => (
            diff(prev, &metrics, &text_fields, updated_by, now),
            prev.update_history.clone(),
            prev.status,
        ),
        None => (Vec::new(), Vec::new(), SubmissionStatus::Draft),
    };
    let appended = changes.len();
    history.extend(changes);
    if history.len() > HISTORY_LIMIT {
        history.drain(..history.len() - HISTORY_LIMIT);
    }

    let location = request
        .location
        .clone()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| location_name(&config.locations, code));

    let submission = Submission {
        id: submission_id(request.week_ending, code),
        location,
        location_code: code.to_string(),
        week_ending: request.week_ending,
        status: request.status.unwrap_or(stored_status),
        metrics,
        text_fields,
        last_updated_by: updated_by.to_string(),
        last_updated_at: Some(now),
        update_history: history,
    };
    Ok((submission, appended))
}
