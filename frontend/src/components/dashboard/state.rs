use super::DashboardProps;
use crate::api::{ApiClient, Subscription};
use chrono::{Local, NaiveDate};
use common::model::submission::Submission;
use common::report::aggregate::WeekSummary;
use common::schedule::next_friday;
use std::collections::HashSet;
use yew::prelude::*;

pub struct Dashboard {
    pub api: ApiClient,
    pub week_ending: NaiveDate,
    pub submissions: Vec<Submission>,
    pub subscription: Option<Subscription>,
    pub loading: bool,
    pub exporting: bool,
    /// Location codes whose cards show their text fields.
    pub expanded: HashSet<String>,
}

impl Dashboard {
    pub fn new(ctx: &Context<Self>) -> Self {
        let api = ctx
            .link()
            .context::<ApiClient>(Callback::noop())
            .map(|(api, _)| api)
            .unwrap_or_default();
        Self {
            api,
            week_ending: next_friday(Local::now().date_naive()),
            submissions: Vec::new(),
            subscription: None,
            loading: false,
            exporting: false,
            expanded: HashSet::new(),
        }
    }

    pub fn summary(&self, props: &DashboardProps) -> WeekSummary {
        WeekSummary::build(self.week_ending, &props.config, &self.submissions)
    }

    pub fn submission(&self, location_code: &str) -> Option<&Submission> {
        self.submissions
            .iter()
            .find(|s| s.location_code == location_code)
    }
}
