//! Layout-independent content of the weekly PDF report.

use chrono::{DateTime, NaiveDate, Utc};
use common::model::config::Config;
use common::model::submission::{format_number, format_signed, Submission};
use common::report::aggregate::aggregate;
use common::report::details::text_entries;

pub const TITLE: &str = "Weekly KPI Report";

/// Metric rows of the per-location table, in print order.
const LOCATION_METRICS: [(&str, &str); 6] = [
    ("openOrders", "Open Orders"),
    ("candidatesInterviewed", "Candidates Interviewed"),
    ("starts", "Starts"),
    ("ends", "Ends"),
    ("salesMeetings", "Sales Meetings"),
    ("marketingComms", "Marketing Communications"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub week_ending: String,
    pub generated: String,
    /// `(label, value)` rows of the summary table.
    pub summary: Vec<(String, String)>,
    pub locations: Vec<LocationReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationReport {
    pub heading: String,
    pub status_line: String,
    pub metrics: Vec<(String, String)>,
    /// Non-empty free-text fields as `(label, text)`.
    pub notes: Vec<(String, String)>,
}

fn row(label: &str, value: String) -> (String, String) {
    (label.to_string(), value)
}

impl Report {
    pub fn build(
        week_ending: NaiveDate,
        config: &Config,
        submissions: &[Submission],
        now: DateTime<Utc>,
    ) -> Self {
        let totals = aggregate(submissions);
        let summary = vec![
            row("Total Open Orders", format_number(totals.get("openOrders"))),
            row("Total Starts", format_number(totals.get("starts"))),
            row("Total Ends", format_number(totals.get("ends"))),
            row("Net Change", format_signed(totals.net_change())),
            row(
                "Candidates Interviewed",
                format_number(totals.get("candidatesInterviewed")),
            ),
            row("Sales Meetings", format_number(totals.get("salesMeetings"))),
            row(
                "Marketing Communications",
                format_number(totals.get("marketingComms")),
            ),
        ];

        Self {
            week_ending: week_ending.format("%b %-d, %Y").to_string(),
            generated: now.format("%b %-d, %Y").to_string(),
            summary,
            locations: submissions
                .iter()
                .map(|s| LocationReport::build(config, s))
                .collect(),
        }
    }

    pub fn filename(week_ending: NaiveDate) -> String {
        format!("KPI_Report_{}.pdf", week_ending.format("%Y-%m-%d"))
    }
}

impl LocationReport {
    fn build(config: &Config, submission: &Submission) -> Self {
        let updated = submission
            .last_updated_at
            .map(|ts| ts.format("%b %-d, %Y %H:%M UTC").to_string())
            .unwrap_or_else(|| "Never".to_string());

        let mut metrics: Vec<_> = LOCATION_METRICS
            .iter()
            .map(|(id, label)| row(label, format_number(submission.metric(id))))
            .collect();
        // Net change sits between Ends and Sales Meetings.
        metrics.insert(4, row("Net Change", format_number(submission.net_change())));

        Self {
            heading: format!("{} ({})", submission.location, submission.location_code),
            status_line: format!("Status: {} | Last Updated: {}", submission.status, updated),
            metrics,
            notes: text_entries(config, submission),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::model::submission::SubmissionStatus;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn submission(code: &str, metrics: &[(&str, f64)], text: &[(&str, &str)]) -> Submission {
        Submission {
            id: format!("2025-01-10_{code}"),
            location: "Granite City".into(),
            location_code: code.into(),
            week_ending: week(),
            status: SubmissionStatus::Submitted,
            metrics: metrics.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            text_fields: text
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            last_updated_by: "jae".into(),
            last_updated_at: Some(Utc.with_ymd_and_hms(2025, 1, 9, 15, 30, 0).unwrap()),
            update_history: Vec::new(),
        }
    }

    #[test]
    fn summary_rows_follow_totals() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        let subs = [submission("30080", &[("starts", 4.0), ("ends", 1.0)], &[])];
        let report = Report::build(week(), &Config::default(), &subs, now);

        assert_eq!(report.week_ending, "Jan 10, 2025");
        assert_eq!(report.summary[1], row("Total Starts", "4".into()));
        assert_eq!(report.summary[3], row("Net Change", "+3".into()));
        assert_eq!(report.summary.len(), 7);
    }

    #[test]
    fn location_section_lists_metrics_and_non_empty_notes() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        let subs = [submission(
            "30080",
            &[("starts", 1.0), ("ends", 3.0)],
            &[("wins", "Two new clients"), ("challenges", "  "), ("legacyNote", "kept")],
        )];
        let report = Report::build(week(), &Config::default(), &subs, now);
        let section = &report.locations[0];

        assert_eq!(section.heading, "Granite City (30080)");
        assert_eq!(
            section.status_line,
            "Status: submitted | Last Updated: Jan 9, 2025 15:30 UTC"
        );
        assert_eq!(section.metrics[4], row("Net Change", "-2".into()));
        assert_eq!(section.metrics.len(), 7);

        let labels: Vec<_> = section.notes.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Wins This Week", "legacyNote"]);
    }

    #[test]
    fn filename_uses_iso_week() {
        assert_eq!(Report::filename(week()), "KPI_Report_2025-01-10.pdf");
    }
}
