//! Update logic for the team form.
//!
//! The auto-save controller decides when to persist; this module arms the
//! browser timer it asks for, runs the persist calls it hands out and reports
//! their outcome back. Remote snapshots only replace the form when the
//! controller has no unsaved or in-flight local edits.

use super::messages::Msg;
use super::state::TeamForm;
use crate::components::helpers::{now_ms, show_toast};
use chrono::Utc;
use common::autosave::{AutoSave, RemoteAction, SaveTicket};
use common::form::{render_form, FormValues};
use common::model::submission::SubmissionStatus;
use common::requests::SaveSubmissionResponse;
use common::schedule::{format_week_ending, parse_week_ending};
use gloo_timers::callback::Timeout;
use yew::platform::spawn_local;
use yew::prelude::*;

/// Number of past weeks shown under the form.
const HISTORY_LIMIT: usize = 10;

pub fn update(component: &mut TeamForm, ctx: &Context<TeamForm>, msg: Msg) -> bool {
    match msg {
        Msg::SelectLocation(code) => {
            flush(component, ctx);
            component.location_code = Some(code).filter(|c| !c.is_empty());
            if let Some(code) = &component.location_code {
                component.api.remember_location(code);
            }
            open(component, ctx);
            true
        }
        Msg::SelectWeek(raw) => match parse_week_ending(&raw) {
            Some(week) if week != component.week_ending => {
                flush(component, ctx);
                component.week_ending = week;
                open(component, ctx);
                true
            }
            _ => false,
        },
        Msg::Remote(doc) => {
            component.loading = false;
            let remote = FormValues::from_submission(doc.as_ref());
            if component.autosave.reconcile_remote(&remote) == RemoteAction::Apply {
                component.values = remote;
            }
            component.stored = doc;
            true
        }
        Msg::History(history) => {
            component.history = history;
            true
        }
        Msg::Edit { field, value } => {
            if component.locked(&ctx.props().config) {
                return false;
            }
            let Some(view) = component.form.field(&field).cloned() else {
                return false;
            };
            component.values.set(&view, value);
            let delay = component.autosave.on_change(&component.values, now_ms());
            arm(component, ctx, delay);
            true
        }
        Msg::TimerFired => {
            component.timer = None;
            if let Some(ticket) = component.autosave.fire(now_ms()) {
                persist(component, ctx, Some(ticket), None);
            }
            true
        }
        Msg::SaveNow => {
            component.timer = None;
            match component.autosave.save_now() {
                Some(ticket) => persist(component, ctx, Some(ticket), None),
                None => show_toast("No changes to save"),
            }
            true
        }
        Msg::MarkSubmitted => {
            if component.location_code.is_none() {
                show_toast("Please select a location and week ending date");
                return false;
            }
            if component.locked(&ctx.props().config) {
                show_toast("This submission is locked and cannot be edited");
                return false;
            }
            component.timer = None;
            component.submitting = true;
            let ticket = component.autosave.save_now();
            persist(component, ctx, ticket, Some(SubmissionStatus::Submitted));
            true
        }
        Msg::Saved {
            generation,
            ticket,
            submitted,
            result,
        } => {
            if submitted {
                component.submitting = false;
            }
            let stale = generation != component.generation;
            if let Err(e) = &result {
                gloo_console::error!(format!("save failed: {}", e));
            }
            if let Some(notice) = save_notice(stale, submitted, &result) {
                show_toast(&notice);
            }
            if stale {
                return submitted;
            }

            if let Some(ticket) = ticket {
                let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
                component.autosave.finish(ticket, outcome, Utc::now());
            }
            if let Ok(response) = result {
                component.stored = Some(response.submission);
                load_history(component, ctx);
            }
            true
        }
    }
}

/// Toast for a finished save. Auto-save failures of the open selection are
/// already shown in the status line; anything else must be announced.
fn save_notice(
    stale: bool,
    submitted: bool,
    result: &Result<SaveSubmissionResponse, String>,
) -> Option<String> {
    match result {
        Err(e) if stale => Some(format!("Earlier changes were not saved: {}", e)),
        Err(e) if submitted => Some(e.clone()),
        Ok(_) if submitted && !stale => Some("Successfully submitted!".to_string()),
        _ => None,
    }
}

/// Rebuilds the inputs after a config change. Values are kept, including
/// those of fields that are now hidden.
pub fn config_changed(component: &mut TeamForm, ctx: &Context<TeamForm>) {
    let config = &ctx.props().config;
    component.form = render_form(config);
    component.autosave.set_interval(config.settings.auto_save_interval);
}

/// Starts over for the current location and week: fresh controller, fresh
/// subscription.
pub fn open(component: &mut TeamForm, ctx: &Context<TeamForm>) {
    component.generation += 1;
    component.timer = None;
    component.subscription = None;
    component.autosave = AutoSave::new(ctx.props().config.settings.auto_save_interval);
    component.values = FormValues::default();
    component.stored = None;
    component.history.clear();
    component.loading = false;

    let Some(code) = component.location_code.clone() else {
        return;
    };
    let path = format!(
        "/api/submissions/week/{}/location/{}/subscribe",
        format_week_ending(component.week_ending),
        code
    );
    match component
        .api
        .subscribe(&path, ctx.link().callback(Msg::Remote))
    {
        Ok(subscription) => {
            component.loading = true;
            component.subscription = Some(subscription);
        }
        Err(e) => gloo_console::error!(format!("cannot subscribe to {}: {}", path, e)),
    }
    load_history(component, ctx);
}

/// Saves unsaved edits before the selection changes.
fn flush(component: &mut TeamForm, ctx: &Context<TeamForm>) {
    component.timer = None;
    if let Some(ticket) = component.autosave.save_now() {
        persist(component, ctx, Some(ticket), None);
    }
}

fn arm(component: &mut TeamForm, ctx: &Context<TeamForm>, delay_ms: u64) {
    let link = ctx.link().clone();
    let delay = u32::try_from(delay_ms).unwrap_or(u32::MAX);
    component.timer = Some(Timeout::new(delay, move || {
        link.send_message(Msg::TimerFired)
    }));
}

fn persist(
    component: &mut TeamForm,
    ctx: &Context<TeamForm>,
    ticket: Option<SaveTicket>,
    status: Option<SubmissionStatus>,
) {
    let Some(request) = component.request(status) else {
        if let Some(ticket) = ticket {
            component
                .autosave
                .finish(ticket, Err("Select a location first".into()), Utc::now());
        }
        return;
    };

    let api = component.api.clone();
    let link = ctx.link().clone();
    let generation = component.generation;
    let submitted = status == Some(SubmissionStatus::Submitted);
    spawn_local(async move {
        let result = api.save_submission(&request).await;
        link.send_message(Msg::Saved {
            generation,
            ticket,
            submitted,
            result,
        });
    });
}

fn load_history(component: &TeamForm, ctx: &Context<TeamForm>) {
    let Some(code) = component.location_code.clone() else {
        return;
    };
    let api = component.api.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        match api.location_history(&code, HISTORY_LIMIT).await {
            Ok(history) => link.send_message(Msg::History(history)),
            Err(e) => gloo_console::warn!(format!("history for {} unavailable: {}", code, e)),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::model::submission::Submission;

    fn saved() -> Result<SaveSubmissionResponse, String> {
        let week_ending = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        Ok(SaveSubmissionResponse {
            id: "2025-01-10_30080".into(),
            changes: 0,
            submission: Submission {
                id: "2025-01-10_30080".into(),
                location: "Granite City".into(),
                location_code: "30080".into(),
                week_ending,
                status: SubmissionStatus::Submitted,
                metrics: Default::default(),
                text_fields: Default::default(),
                last_updated_by: "jae".into(),
                last_updated_at: None,
                update_history: Vec::new(),
            },
        })
    }

    #[test]
    fn failed_save_of_previous_selection_is_announced() {
        let failed = Err("backend unavailable".to_string());
        assert_eq!(
            save_notice(true, false, &failed).as_deref(),
            Some("Earlier changes were not saved: backend unavailable")
        );
        assert_eq!(save_notice(true, false, &saved()), None);
    }

    #[test]
    fn auto_save_failure_is_left_to_the_status_line() {
        let failed = Err("backend unavailable".to_string());
        assert_eq!(save_notice(false, false, &failed), None);
        assert_eq!(
            save_notice(false, true, &failed).as_deref(),
            Some("backend unavailable")
        );
        assert_eq!(
            save_notice(false, true, &saved()).as_deref(),
            Some("Successfully submitted!")
        );
    }
}
