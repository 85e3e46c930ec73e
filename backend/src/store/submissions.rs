use super::{Store, StoreError};
use chrono::NaiveDate;
use common::model::submission::{submission_id, Submission};
use common::schedule::format_week_ending;
use rusqlite::{params, Connection, OptionalExtension, Params};

fn decode(id: String, body: String) -> Result<Submission, StoreError> {
    serde_json::from_str(&body).map_err(|source| StoreError::Document { id, source })
}

fn query_submissions<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Submission>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(|(id, body)| decode(id, body)).collect()
}

fn fetch(conn: &Connection, id: &str) -> Result<Option<Submission>, StoreError> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM submissions WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    body.map(|b| decode(id.to_string(), b)).transpose()
}

impl Store {
    pub fn get_submission(
        &self,
        week_ending: NaiveDate,
        location_code: &str,
    ) -> Result<Option<Submission>, StoreError> {
        fetch(&*self.conn()?, &submission_id(week_ending, location_code))
    }

    /// All submissions of one week, ordered by location code.
    pub fn submissions_for_week(&self, week_ending: NaiveDate) -> Result<Vec<Submission>, StoreError> {
        query_submissions(
            &*self.conn()?,
            "SELECT id, body FROM submissions WHERE week_ending = ?1 ORDER BY location_code",
            params![format_week_ending(week_ending)],
        )
    }

    /// The most recent `limit` submissions of a location, newest week first.
    pub fn location_history(
        &self,
        location_code: &str,
        limit: usize,
    ) -> Result<Vec<Submission>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        query_submissions(
            &*self.conn()?,
            "SELECT id, body FROM submissions WHERE location_code = ?1
             ORDER BY week_ending DESC LIMIT ?2",
            params![location_code, limit],
        )
    }

    /// Every stored submission, for the backup export.
    pub fn all_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        query_submissions(
            &*self.conn()?,
            "SELECT id, body FROM submissions ORDER BY week_ending, location_code",
            [],
        )
    }

    /// Read-modify-write of one submission document inside a transaction.
    ///
    /// `update` receives the stored document, if any, and returns the document
    /// to write plus a count that is passed back to the caller untouched.
    pub fn update_submission<F, E>(
        &self,
        week_ending: NaiveDate,
        location_code: &str,
        update: F,
    ) -> Result<(Submission, usize), E>
    where
        F: FnOnce(Option<&Submission>) -> Result<(Submission, usize), E>,
        E: From<StoreError>,
    {
        let id = submission_id(week_ending, location_code);
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(StoreError::from)?;

        let existing = fetch(&tx, &id)?;
        let (mut next, count) = update(existing.as_ref())?;
        next.id = id.clone();

        let body = serde_json::to_string(&next).map_err(StoreError::Encode)?;
        tx.execute(
            "INSERT OR REPLACE INTO submissions (id, week_ending, location_code, body, updated_at)
             VALUES (?1, ?2, ?3, ?4, datetime('now'))",
            params![id, format_week_ending(week_ending), location_code, body],
        )
        .map_err(StoreError::from)?;
        tx.commit().map_err(StoreError::from)?;

        log::debug!("stored submission {} ({} changes)", id, count);
        Ok((next, count))
    }
}
