use crate::model::config::Config;
use crate::model::submission::{Submission, format_signed};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Summed metrics of one week, keyed by metric field id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Totals(pub BTreeMap<String, f64>);

impl Totals {
    pub fn get(&self, field_id: &str) -> f64 {
        self.0.get(field_id).copied().unwrap_or(0.0)
    }

    /// Starts minus ends, taken from the totals rather than summed per location.
    pub fn net_change(&self) -> f64 {
        self.get("starts") - self.get("ends")
    }

    pub fn net_change_label(&self) -> String {
        format_signed(self.net_change())
    }
}

/// Sums every metric across the given submissions.
pub fn aggregate(submissions: &[Submission]) -> Totals {
    let mut totals = BTreeMap::new();
    for submission in submissions {
        for (field_id, value) in &submission.metrics {
            let value = if value.is_finite() { *value } else { 0.0 };
            *totals.entry(field_id.clone()).or_insert(0.0) += value;
        }
    }
    Totals(totals)
}

/// Dashboard header for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week_ending: NaiveDate,
    pub totals: Totals,
    pub net_change: f64,
    /// Active locations with a submission this week.
    pub submitted: usize,
    /// Active locations in the config.
    pub expected: usize,
}

impl WeekSummary {
    pub fn build(week_ending: NaiveDate, config: &Config, submissions: &[Submission]) -> Self {
        let totals = aggregate(submissions);
        let reported: HashSet<&str> = submissions
            .iter()
            .map(|s| s.location_code.as_str())
            .collect();
        let expected = config.active_locations().count();
        let submitted = config
            .active_locations()
            .filter(|l| reported.contains(l.code.as_str()))
            .count();
        Self {
            week_ending,
            net_change: totals.net_change(),
            totals,
            submitted,
            expected,
        }
    }

    /// `"1/2"` as shown on the "Locations Submitted" card.
    pub fn submitted_label(&self) -> String {
        format!("{}/{}", self.submitted, self.expected)
    }
}
