use crate::model::config::Config;
use crate::model::submission::{coerce_metric, Submission, SubmissionStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payload of `POST /api/submissions`.
///
/// Metrics arrive exactly as typed in the form (numbers or strings) and are
/// coerced with [`coerce_metric`] before anything is diffed or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSubmissionRequest {
    /// Display name of the location. Resolved from the config when omitted.
    #[serde(default)]
    pub location: Option<String>,
    pub location_code: String,
    pub week_ending: NaiveDate,
    /// Keeps the stored status when omitted.
    #[serde(default)]
    pub status: Option<SubmissionStatus>,
    #[serde(default)]
    pub metrics: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub text_fields: BTreeMap<String, String>,
}

impl SaveSubmissionRequest {
    pub fn coerced_metrics(&self) -> BTreeMap<String, f64> {
        self.metrics
            .iter()
            .map(|(k, v)| (k.clone(), coerce_metric(v)))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSubmissionResponse {
    pub id: String,
    /// Number of change records appended by this save.
    pub changes: usize,
    pub submission: Submission,
}

/// Payload of `PUT /api/config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    pub config: Config,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}
