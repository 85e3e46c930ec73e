//! Debounced auto-save state machine.
//!
//! The controller owns no timer and performs no I/O. The host (the yew form)
//! reports edits with [`AutoSave::on_change`], arms a timer for the returned
//! delay, calls [`AutoSave::fire`] when it expires and runs the persist call
//! for any [`SaveTicket`] it gets back, reporting the outcome through
//! [`AutoSave::finish`]. Time is passed in as milliseconds so the schedule can
//! be driven by a browser clock or a test clock alike.
//!
//! A state whose fingerprint equals the last successfully saved one is never
//! persisted again. The fingerprint is the MD5 digest of the state's JSON
//! serialization.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fingerprint of a serializable state.
pub fn fingerprint<S: Serialize>(state: &S) -> String {
    let json = serde_json::to_string(state).unwrap_or_default();
    format!("{:x}", md5::compute(json.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    due_at: u64,
}

/// Handle for one persist call. Must be handed back to [`AutoSave::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    fingerprint: String,
    seq: u64,
}

/// What the host should do with a snapshot pushed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    /// Replace the local form state with the remote one.
    Apply,
    /// Local edits are unsaved or in flight; keep them. They win on save.
    KeepLocal,
}

#[derive(Debug, Clone)]
pub struct AutoSave {
    interval_ms: u64,
    pending: Option<Pending>,
    current: Option<String>,
    saved: Option<String>,
    in_flight: usize,
    /// Sequence number of the last ticket handed out.
    issued: u64,
    /// Sequence number of the newest ticket whose outcome was recorded.
    applied: u64,
    last_saved: Option<DateTime<Utc>>,
    error: Option<String>,
}

impl AutoSave {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            pending: None,
            current: None,
            saved: None,
            in_flight: 0,
            issued: 0,
            applied: 0,
            last_saved: None,
            error: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Changes the debounce delay. An armed timer keeps its deadline.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    /// True while at least one persist call is outstanding.
    pub fn saving(&self) -> bool {
        self.in_flight > 0
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the latest known state differs from what was last saved.
    pub fn is_dirty(&self) -> bool {
        self.current.is_some() && self.current != self.saved
    }

    /// Records `state` as already persisted, e.g. right after loading it.
    /// Cancels any armed timer.
    pub fn baseline<S: Serialize>(&mut self, state: &S) {
        let fp = fingerprint(state);
        self.current = Some(fp.clone());
        self.saved = Some(fp);
        self.pending = None;
        self.applied = self.issued;
    }

    /// Records an edit and (re)arms the debounce. Returns the delay in
    /// milliseconds after which [`AutoSave::fire`] should be called.
    pub fn on_change<S: Serialize>(&mut self, state: &S, now_ms: u64) -> u64 {
        self.current = Some(fingerprint(state));
        self.pending = Some(Pending {
            due_at: now_ms.saturating_add(self.interval_ms),
        });
        self.interval_ms
    }

    /// Milliseconds left until the armed timer is due, if one is armed.
    pub fn remaining(&self, now_ms: u64) -> Option<u64> {
        self.pending
            .as_ref()
            .map(|p| p.due_at.saturating_sub(now_ms))
    }

    /// Timer callback. Returns a ticket when the debounce has elapsed and the
    /// state differs from the last saved one.
    pub fn fire(&mut self, now_ms: u64) -> Option<SaveTicket> {
        match &self.pending {
            Some(p) if now_ms >= p.due_at => {
                self.pending = None;
                self.begin()
            }
            _ => None,
        }
    }

    /// Cancels the armed timer and starts a save right away, unless nothing
    /// changed since the last successful save.
    pub fn save_now(&mut self) -> Option<SaveTicket> {
        self.pending = None;
        self.begin()
    }

    fn begin(&mut self) -> Option<SaveTicket> {
        let current = self.current.clone()?;
        if self.saved.as_ref() == Some(&current) {
            return None;
        }
        self.in_flight += 1;
        self.issued += 1;
        self.error = None;
        Some(SaveTicket {
            fingerprint: current,
            seq: self.issued,
        })
    }

    /// Reports the outcome of a persist call. A failure keeps the previous
    /// `last_saved` and is not retried; the next edit or manual save retries.
    /// An outcome older than one already recorded is ignored: the newer save
    /// carried later state.
    pub fn finish(&mut self, ticket: SaveTicket, result: Result<(), String>, now: DateTime<Utc>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if ticket.seq <= self.applied {
            return;
        }
        self.applied = ticket.seq;
        match result {
            Ok(()) => {
                self.saved = Some(ticket.fingerprint);
                self.last_saved = Some(now);
            }
            Err(message) => self.error = Some(message),
        }
    }

    /// Decides whether a pushed remote snapshot may overwrite the form.
    /// When it may, the remote state becomes the new baseline.
    pub fn reconcile_remote<S: Serialize>(&mut self, remote: &S) -> RemoteAction {
        if self.pending.is_some() || self.saving() {
            return RemoteAction::KeepLocal;
        }
        if self.is_dirty() {
            return RemoteAction::KeepLocal;
        }
        self.baseline(remote);
        RemoteAction::Apply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    const INTERVAL: u64 = 60_000;

    fn state(starts: &str) -> BTreeMap<&'static str, String> {
        let mut m = BTreeMap::new();
        m.insert("starts", starts.to_string());
        m
    }

    fn clock(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    /// Drives the controller against a virtual clock and returns the times at
    /// which persist calls started.
    fn run(edits: &[(u64, &str)], until: u64) -> Vec<u64> {
        let mut saver = AutoSave::new(INTERVAL);
        saver.baseline(&state(""));
        let mut persisted = Vec::new();
        let mut edits = edits.iter().peekable();
        for now in 0..=until {
            while let Some((_, value)) = edits.next_if(|(t, _)| *t == now) {
                saver.on_change(&state(value), now);
            }
            if let Some(ticket) = saver.fire(now) {
                persisted.push(now);
                saver.finish(ticket, Ok(()), clock(now as i64));
            }
        }
        persisted
    }

    #[test]
    fn single_edit_persists_once_after_interval() {
        assert_eq!(run(&[(0, "1")], 200_000), vec![60_000]);
    }

    #[test]
    fn second_edit_resets_the_timer() {
        assert_eq!(run(&[(0, "1"), (30_000, "2")], 200_000), vec![90_000]);
    }

    #[test]
    fn unchanged_state_is_not_persisted() {
        assert!(run(&[(0, "")], 200_000).is_empty());
        assert!(run(&[(0, "3"), (10_000, "")], 200_000).is_empty());
    }

    #[test]
    fn save_now_cancels_pending_timer() {
        let mut saver = AutoSave::new(INTERVAL);
        saver.baseline(&state(""));
        saver.on_change(&state("4"), 0);
        assert!(saver.is_pending());

        let ticket = saver.save_now().expect("changed state is saved");
        assert!(saver.saving());
        assert!(!saver.is_pending());
        saver.finish(ticket, Ok(()), clock(10));

        assert_eq!(saver.fire(INTERVAL), None);
        assert_eq!(saver.save_now(), None);
        assert_eq!(saver.last_saved(), Some(clock(10)));
    }

    #[test]
    fn failure_keeps_last_saved_and_clears_on_retry() {
        let mut saver = AutoSave::new(INTERVAL);
        saver.baseline(&state(""));
        saver.on_change(&state("1"), 0);
        let ticket = saver.fire(INTERVAL).unwrap();
        saver.finish(ticket, Ok(()), clock(1));

        saver.on_change(&state("2"), INTERVAL);
        let ticket = saver.fire(2 * INTERVAL).unwrap();
        saver.finish(ticket, Err("backend unavailable".into()), clock(2));
        assert_eq!(saver.error(), Some("backend unavailable"));
        assert_eq!(saver.last_saved(), Some(clock(1)));
        assert!(!saver.saving());

        // no automatic retry
        assert_eq!(saver.fire(3 * INTERVAL), None);

        let retry = saver.save_now().expect("failed state is still dirty");
        assert_eq!(saver.error(), None);
        saver.finish(retry, Ok(()), clock(3));
        assert_eq!(saver.last_saved(), Some(clock(3)));
    }

    #[test]
    fn overlapping_saves_are_not_serialized() {
        let mut saver = AutoSave::new(INTERVAL);
        saver.baseline(&state(""));
        saver.on_change(&state("1"), 0);
        let first = saver.save_now().unwrap();
        saver.on_change(&state("2"), 1);
        let second = saver.fire(1 + INTERVAL).unwrap();
        saver.finish(first, Ok(()), clock(5));
        assert!(saver.saving());
        saver.finish(second, Ok(()), clock(6));
        assert!(!saver.saving());
        assert!(!saver.is_dirty());
    }

    #[test]
    fn older_save_finishing_last_does_not_regress_state() {
        let mut saver = AutoSave::new(INTERVAL);
        saver.baseline(&state(""));
        saver.on_change(&state("1"), 0);
        let older = saver.save_now().unwrap();
        saver.on_change(&state("2"), 1);
        let newer = saver.save_now().unwrap();

        saver.finish(newer, Ok(()), clock(6));
        saver.finish(older, Ok(()), clock(7));

        assert!(!saver.saving());
        assert!(!saver.is_pending());
        assert!(!saver.is_dirty());
        assert_eq!(saver.last_saved(), Some(clock(6)));
        assert_eq!(saver.reconcile_remote(&state("5")), RemoteAction::Apply);
    }

    #[test]
    fn stale_failure_does_not_mask_newer_success() {
        let mut saver = AutoSave::new(INTERVAL);
        saver.baseline(&state(""));
        saver.on_change(&state("1"), 0);
        let older = saver.save_now().unwrap();
        saver.on_change(&state("2"), 1);
        let newer = saver.save_now().unwrap();

        saver.finish(newer, Ok(()), clock(6));
        saver.finish(older, Err("timeout".into()), clock(7));
        assert_eq!(saver.error(), None);
        assert!(!saver.is_dirty());
    }

    #[test]
    fn remote_snapshot_waits_for_local_edits() {
        let mut saver = AutoSave::new(INTERVAL);
        saver.baseline(&state("1"));
        assert_eq!(saver.reconcile_remote(&state("2")), RemoteAction::Apply);

        saver.on_change(&state("3"), 0);
        assert_eq!(saver.reconcile_remote(&state("9")), RemoteAction::KeepLocal);

        let ticket = saver.fire(INTERVAL).unwrap();
        assert_eq!(saver.reconcile_remote(&state("9")), RemoteAction::KeepLocal);
        saver.finish(ticket, Ok(()), clock(1));
        assert_eq!(saver.reconcile_remote(&state("3")), RemoteAction::Apply);
        assert!(!saver.is_dirty());
    }

    #[test]
    fn remaining_counts_down() {
        let mut saver = AutoSave::new(1_000);
        assert_eq!(saver.remaining(0), None);
        saver.on_change(&state("1"), 500);
        assert_eq!(saver.remaining(700), Some(800));
        assert_eq!(saver.remaining(5_000), Some(0));
    }
}
