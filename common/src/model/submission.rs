//! Submission documents and their audit trail.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of change records kept per submission. Older entries are evicted.
pub const HISTORY_LIMIT: usize = 50;

/// Storage format of `weekEnding` and the first half of a submission id.
pub const WEEK_ENDING_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Draft,
    Submitted,
    Locked,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Locked => "locked",
        };
        f.write_str(label)
    }
}

/// A value recorded in the audit trail: either side of a metric or text change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", format_number(*n)),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of `updateHistory`. `None` marks a key that was absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub timestamp: DateTime<Utc>,
    /// `metrics.<id>` or `textFields.<id>`.
    pub field: String,
    pub old_value: Option<FieldValue>,
    pub new_value: Option<FieldValue>,
    pub updated_by: String,
}

/// One location's report for one week. Identity is `<weekEnding>_<locationCode>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub id: String,
    pub location: String,
    pub location_code: String,
    pub week_ending: NaiveDate,
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub text_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub last_updated_by: String,
    #[serde(default)]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_history: Vec<Change>,
}

impl Submission {
    /// Metric value, 0 when the key was never stored.
    pub fn metric(&self, field_id: &str) -> f64 {
        self.metrics.get(field_id).copied().unwrap_or(0.0)
    }

    pub fn net_change(&self) -> f64 {
        self.metric("starts") - self.metric("ends")
    }

    /// Text value, `None` when absent or blank.
    pub fn text(&self, field_id: &str) -> Option<&str> {
        self.text_fields
            .get(field_id)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

pub fn submission_id(week_ending: NaiveDate, location_code: &str) -> String {
    format!("{}_{}", week_ending.format(WEEK_ENDING_FORMAT), location_code)
}

/// Coerces a raw form value to a metric number. Anything that is not a finite
/// number, or a string holding one, becomes 0.
pub fn coerce_metric(value: &serde_json::Value) -> f64 {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Renders whole numbers without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// `+3`, `-2`, `0`: the signed form used for net change.
pub fn format_signed(n: f64) -> String {
    if n > 0.0 {
        format!("+{}", format_number(n))
    } else {
        format_number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_joins_week_and_code() {
        let week = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(submission_id(week, "30080"), "2025-01-10_30080");
    }

    #[test]
    fn invalid_metric_input_becomes_zero() {
        assert_eq!(coerce_metric(&json!(4)), 4.0);
        assert_eq!(coerce_metric(&json!(" 7 ")), 7.0);
        assert_eq!(coerce_metric(&json!("2.5")), 2.5);
        assert_eq!(coerce_metric(&json!("")), 0.0);
        assert_eq!(coerce_metric(&json!("abc")), 0.0);
        assert_eq!(coerce_metric(&json!("NaN")), 0.0);
        assert_eq!(coerce_metric(&json!(null)), 0.0);
        assert_eq!(coerce_metric(&json!([1])), 0.0);
    }

    #[test]
    fn signed_formatting() {
        assert_eq!(format_signed(3.0), "+3");
        assert_eq!(format_signed(-2.0), "-2");
        assert_eq!(format_signed(0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
    }

    #[test]
    fn missing_values_read_as_empty() {
        let submission: Submission = serde_json::from_value(json!({
            "location": "Peoria",
            "locationCode": "81074",
            "weekEnding": "2025-01-10",
            "metrics": {"starts": 2},
            "textFields": {"wins": "  "}
        }))
        .unwrap();
        assert_eq!(submission.status, SubmissionStatus::Draft);
        assert_eq!(submission.metric("ends"), 0.0);
        assert_eq!(submission.net_change(), 2.0);
        assert_eq!(submission.text("wins"), None);
    }

    #[test]
    fn change_values_serialize_as_plain_json() {
        let change = Change {
            timestamp: Utc::now(),
            field: "metrics.starts".into(),
            old_value: None,
            new_value: Some(FieldValue::Number(5.0)),
            updated_by: "jae@example.com".into(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["oldValue"], serde_json::Value::Null);
        assert_eq!(json["newValue"], json!(5.0));
    }
}
