use crate::api::{ApiClient, Subscription};
use crate::components::config_editor::ConfigEditor;
use crate::components::dashboard::Dashboard;
use crate::components::team_form::TeamForm;
use common::model::config::Config;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Team,
    Dashboard,
    Configuration,
}

pub enum Msg {
    Config(Config),
    Show(Page),
}

/// Shell holding the client, the live config and the active page.
pub struct App {
    api: ApiClient,
    config: Option<Rc<Config>>,
    page: Page,
    _config_subscription: Option<Subscription>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let api = ApiClient::new("");
        let subscription = api
            .subscribe("/api/config/subscribe", ctx.link().callback(Msg::Config))
            .map_err(|e| gloo_console::error!(format!("cannot subscribe to config: {}", e)))
            .ok();
        Self {
            api,
            config: None,
            page: Page::Team,
            _config_subscription: subscription,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Config(config) => {
                self.config = Some(Rc::new(config));
                true
            }
            Msg::Show(page) => {
                let changed = self.page != page;
                self.page = page;
                changed
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let tab = |page: Page, label: &'static str| {
            html! {
                <button
                    class={classes!("tab-btn", (self.page == page).then_some("active"))}
                    onclick={link.callback(move |_| Msg::Show(page))}
                >
                    { label }
                </button>
            }
        };

        let body = match &self.config {
            None => html! { <div class="loading">{"Loading configuration..."}</div> },
            Some(config) => match self.page {
                Page::Team => html! { <TeamForm config={config.clone()} /> },
                Page::Dashboard => html! { <Dashboard config={config.clone()} /> },
                Page::Configuration => html! { <ConfigEditor config={config.clone()} /> },
            },
        };

        html! {
            <ContextProvider<ApiClient> context={self.api.clone()}>
                <div class="app">
                    <header class="app-header">
                        <h1>{"Weekly KPI Report"}</h1>
                        <nav class="tab-bar">
                            { tab(Page::Team, "Team Form") }
                            { tab(Page::Dashboard, "Dashboard") }
                            { tab(Page::Configuration, "Configuration") }
                        </nav>
                    </header>
                    <main>{ body }</main>
                </div>
            </ContextProvider<ApiClient>>
        }
    }
}
