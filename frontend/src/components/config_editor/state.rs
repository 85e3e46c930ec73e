use super::messages::Tab;
use crate::api::ApiClient;
use common::model::config::Config;
use yew::prelude::*;

pub struct ConfigEditor {
    pub api: ApiClient,
    /// Working copy edited by the form.
    pub draft: Config,
    pub dirty: bool,
    pub saving: bool,
    pub tab: Tab,
}

impl ConfigEditor {
    pub fn new(ctx: &Context<Self>) -> Self {
        let api = ctx
            .link()
            .context::<ApiClient>(Callback::noop())
            .map(|(api, _)| api)
            .unwrap_or_default();
        Self {
            api,
            draft: ctx.props().config.as_ref().clone(),
            dirty: false,
            saving: false,
            tab: Tab::Locations,
        }
    }
}
