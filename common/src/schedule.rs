//! Reporting calendar: week-ending dates and the submission lock deadline.

use crate::model::config::{ConfigError, Settings};
use crate::model::submission::WEEK_ENDING_FORMAT;
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

/// The Friday that closes the reporting week containing `today`.
///
/// On a Friday this is the following Friday, as the week being filled in is
/// the upcoming one.
pub fn next_friday(today: NaiveDate) -> NaiveDate {
    let dow = today.weekday().num_days_from_sunday();
    let ahead = match (5 + 7 - dow) % 7 {
        0 => 7,
        n => n,
    };
    today + Days::new(u64::from(ahead))
}

/// Parses a `YYYY-MM-DD` week ending. Returns `None` on anything malformed.
pub fn parse_week_ending(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), WEEK_ENDING_FORMAT).ok()
}

pub fn format_week_ending(date: NaiveDate) -> String {
    date.format(WEEK_ENDING_FORMAT).to_string()
}

/// When a week's submissions become read-only.
///
/// The deadline is the first `weekday` on or after the week ending, at `time`
/// in the given UTC offset. A submission is locked strictly after that
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRule {
    pub weekday: Weekday,
    pub time: NaiveTime,
    pub offset: FixedOffset,
}

impl LockRule {
    pub fn from_settings(settings: &Settings, offset: FixedOffset) -> Result<Self, ConfigError> {
        Ok(Self {
            weekday: settings.deadline_weekday()?,
            time: settings.deadline_clock()?,
            offset,
        })
    }

    pub fn deadline(&self, week_ending: NaiveDate) -> DateTime<Utc> {
        let from = week_ending.weekday().num_days_from_sunday();
        let to = self.weekday.num_days_from_sunday();
        let ahead = (to + 7 - from) % 7;
        let local = (week_ending + Days::new(u64::from(ahead))).and_time(self.time);
        match self.offset.from_local_datetime(&local).single() {
            Some(dt) => dt.with_timezone(&Utc),
            None => local.and_utc(),
        }
    }

    pub fn is_locked(&self, week_ending: NaiveDate, now: DateTime<Utc>) -> bool {
        now > self.deadline(week_ending)
    }
}
