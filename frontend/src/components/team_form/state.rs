use super::TeamFormProps;
use crate::api::{ApiClient, Subscription};
use chrono::{Local, NaiveDate, Offset, Utc};
use common::autosave::AutoSave;
use common::form::{render_form, FormValues, FormView};
use common::model::config::Config;
use common::model::submission::{Submission, SubmissionStatus};
use common::requests::SaveSubmissionRequest;
use common::schedule::{next_friday, LockRule};
use gloo_timers::callback::Timeout;
use yew::prelude::*;

pub struct TeamForm {
    pub api: ApiClient,
    pub location_code: Option<String>,
    pub week_ending: NaiveDate,
    pub form: FormView,
    pub values: FormValues,
    /// Last stored document seen, from the subscription or a save response.
    pub stored: Option<Submission>,
    pub autosave: AutoSave,
    /// Armed debounce timer. Dropping it cancels it.
    pub timer: Option<Timeout>,
    pub subscription: Option<Subscription>,
    pub history: Vec<Submission>,
    /// Bumped whenever location or week changes.
    pub generation: u64,
    pub loading: bool,
    pub submitting: bool,
}

impl TeamForm {
    pub fn new(ctx: &Context<Self>) -> Self {
        let api = ctx
            .link()
            .context::<ApiClient>(Callback::noop())
            .map(|(api, _)| api)
            .unwrap_or_default();
        let config = &ctx.props().config;
        let location_code = api
            .remembered_location()
            .filter(|code| config.active_locations().any(|l| &l.code == code));

        Self {
            api,
            location_code,
            week_ending: next_friday(Local::now().date_naive()),
            form: render_form(config),
            values: FormValues::default(),
            stored: None,
            autosave: AutoSave::new(config.settings.auto_save_interval),
            timer: None,
            subscription: None,
            history: Vec::new(),
            generation: 0,
            loading: false,
            submitting: false,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.stored.as_ref().map(|s| s.status).unwrap_or_default()
    }

    /// Past the deadline, or explicitly locked. The server enforces the same
    /// rule in its own offset; this only drives the UI.
    pub fn locked(&self, config: &Config) -> bool {
        if self.status() == SubmissionStatus::Locked {
            return true;
        }
        LockRule::from_settings(&config.settings, Utc.fix())
            .map(|rule| rule.is_locked(self.week_ending, Utc::now()))
            .unwrap_or(false)
    }

    /// Save payload for the current values, if a location is selected.
    pub fn request(&self, status: Option<SubmissionStatus>) -> Option<SaveSubmissionRequest> {
        let code = self.location_code.clone()?;
        Some(SaveSubmissionRequest {
            location: None,
            location_code: code,
            week_ending: self.week_ending,
            status,
            metrics: self.values.metrics_payload(&self.form),
            text_fields: self.values.text_payload(&self.form),
        })
    }
}
