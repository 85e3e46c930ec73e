//! Display helpers shared by the dashboard, the form and the PDF report.
//!
//! None of these fail: malformed input renders as an empty string or a
//! neutral label.

use crate::model::submission::SubmissionStatus;
use crate::schedule::parse_week_ending;
use chrono::{DateTime, Utc};

/// `"2025-01-10"` → `"Jan 10, 2025"`; anything unparsable → `""`.
pub fn format_date(raw: &str) -> String {
    parse_week_ending(raw)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Relative age of a timestamp, e.g. `"5 minutes ago"`. `None` → `"Never"`.
pub fn format_relative(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = timestamp else {
        return "Never".to_string();
    };
    let secs = (now - ts).num_seconds();
    if secs < 45 {
        return "less than a minute ago".to_string();
    }
    let minutes = (secs + 30) / 60;
    match minutes {
        0..=1 => "1 minute ago".to_string(),
        2..=44 => format!("{minutes} minutes ago"),
        45..=89 => "about 1 hour ago".to_string(),
        90..=1439 => format!("about {} hours ago", (minutes + 30) / 60),
        1440..=2519 => "1 day ago".to_string(),
        2520..=43199 => format!("{} days ago", (minutes + 720) / 1440),
        _ => ts.format("%b %-d, %Y").to_string(),
    }
}

/// Badge shown next to a location on the dashboard and the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Submitted,
    Locked,
    UpdatedToday,
    UpdatedYesterday,
    Stale,
    NoData,
}

impl Freshness {
    pub fn of(
        status: SubmissionStatus,
        last_updated_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        match status {
            SubmissionStatus::Submitted => return Freshness::Submitted,
            SubmissionStatus::Locked => return Freshness::Locked,
            SubmissionStatus::Draft => {}
        }
        let Some(ts) = last_updated_at else {
            return Freshness::NoData;
        };
        match (now - ts).num_hours() {
            h if h < 24 => Freshness::UpdatedToday,
            h if h < 48 => Freshness::UpdatedYesterday,
            _ => Freshness::Stale,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Freshness::Submitted => "Submitted",
            Freshness::Locked => "Locked",
            Freshness::UpdatedToday => "Updated today",
            Freshness::UpdatedYesterday => "Updated yesterday",
            Freshness::Stale => "Stale data",
            Freshness::NoData => "No data",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Freshness::Submitted => "green",
            Freshness::Locked => "gray",
            Freshness::UpdatedToday => "blue",
            Freshness::UpdatedYesterday => "yellow",
            Freshness::Stale | Freshness::NoData => "red",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn malformed_dates_render_empty() {
        assert_eq!(format_date("2025-01-10"), "Jan 10, 2025");
        assert_eq!(format_date("10/01/2025"), "");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn relative_times() {
        assert_eq!(format_relative(None, now()), "Never");
        assert_eq!(
            format_relative(Some(now() - Duration::seconds(10)), now()),
            "less than a minute ago"
        );
        assert_eq!(
            format_relative(Some(now() - Duration::minutes(5)), now()),
            "5 minutes ago"
        );
        assert_eq!(
            format_relative(Some(now() - Duration::hours(3)), now()),
            "about 3 hours ago"
        );
        assert_eq!(
            format_relative(Some(now() - Duration::days(4)), now()),
            "4 days ago"
        );
    }

    #[test]
    fn freshness_by_status_and_age() {
        let draft = SubmissionStatus::Draft;
        assert_eq!(
            Freshness::of(SubmissionStatus::Submitted, None, now()),
            Freshness::Submitted
        );
        assert_eq!(Freshness::of(draft, None, now()), Freshness::NoData);
        assert_eq!(
            Freshness::of(draft, Some(now() - Duration::hours(2)), now()),
            Freshness::UpdatedToday
        );
        assert_eq!(
            Freshness::of(draft, Some(now() - Duration::hours(30)), now()),
            Freshness::UpdatedYesterday
        );
        let stale = Freshness::of(draft, Some(now() - Duration::hours(72)), now());
        assert_eq!(stale.label(), "Stale data");
        assert_eq!(stale.color(), "red");
    }
}
