//! View rendering for the team form.
//!
//! Header with the location and week pickers, the auto-save status line, one
//! card per enabled section and the location's recent weeks underneath.

use super::messages::Msg;
use super::state::TeamForm;
use chrono::Utc;
use common::form::{FieldView, InputKind};
use common::formatters::{format_date, format_relative, Freshness};
use common::model::submission::{format_number, format_signed, Submission, SubmissionStatus};
use common::schedule::format_week_ending;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

pub fn view(component: &TeamForm, ctx: &Context<TeamForm>) -> Html {
    let link = ctx.link();
    let locked = component.locked(&ctx.props().config);

    html! {
        <div class="team-form">
            { build_header(component, ctx) }
            {
                if component.location_code.is_none() {
                    html! {
                        <div class="empty-state">
                            {"Select a location to start this week's report."}
                        </div>
                    }
                } else if component.loading {
                    html! { <div class="loading">{"Loading..."}</div> }
                } else {
                    html! {
                        <>
                            { build_status(component, locked) }
                            { for component.form.sections.iter().map(|section| html! {
                                <div class="form-section card">
                                    <h3>{ &section.title }</h3>
                                    { for section.fields.iter().map(|field| build_field(component, link, field, locked)) }
                                </div>
                            }) }
                            { build_net_change(component) }
                            { build_actions(component, link, locked) }
                            { build_history(component) }
                        </>
                    }
                }
            }
        </div>
    }
}

fn build_header(component: &TeamForm, ctx: &Context<TeamForm>) -> Html {
    let link = ctx.link();
    let selected = component.location_code.clone().unwrap_or_default();
    let on_location = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SelectLocation(select.value())
    });
    let on_week = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SelectWeek(input.value())
    });

    let freshness = Freshness::of(
        component.status(),
        component.stored.as_ref().and_then(|s| s.last_updated_at),
        Utc::now(),
    );

    html! {
        <div class="form-header">
            <label>
                {"Location"}
                <select onchange={on_location}>
                    <option value="" selected={selected.is_empty()}>{"Select location..."}</option>
                    { for ctx.props().config.active_locations().map(|l| html! {
                        <option value={l.code.clone()} selected={l.code == selected}>
                            { l.display_name() }
                        </option>
                    }) }
                </select>
            </label>
            <label>
                {"Week ending"}
                <input
                    type="date"
                    value={format_week_ending(component.week_ending)}
                    onchange={on_week}
                />
            </label>
            if component.location_code.is_some() {
                <span class={classes!("badge", freshness.color())}>{ freshness.label() }</span>
            }
        </div>
    }
}

fn build_status(component: &TeamForm, locked: bool) -> Html {
    let autosave = &component.autosave;
    let line = if autosave.saving() {
        "Saving...".to_string()
    } else if let Some(error) = autosave.error() {
        format!("Save failed: {}", error)
    } else if autosave.is_dirty() {
        "Unsaved changes".to_string()
    } else {
        format!("Last saved {}", format_relative(autosave.last_saved(), Utc::now()))
    };

    html! {
        <>
            if locked {
                <div class="locked-banner">
                    {"This week is locked. The deadline has passed and the report can no longer be edited."}
                </div>
            }
            <div class={classes!("autosave-status", autosave.error().map(|_| "error"))}>
                { line }
            </div>
        </>
    }
}

fn build_field(
    component: &TeamForm,
    link: &Scope<TeamForm>,
    field: &FieldView,
    locked: bool,
) -> Html {
    let value = component.values.get(field).to_string();
    let id = field.id.clone();

    let input = match &field.input {
        InputKind::Number => {
            let oninput = link.callback(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                Msg::Edit {
                    field: id.clone(),
                    value: input.value(),
                }
            });
            html! {
                <input type="number" min="0" {value} {oninput}
                    placeholder={field.placeholder.clone()} disabled={locked} />
            }
        }
        InputKind::MultiLine { rows } => {
            let oninput = link.callback(move |e: InputEvent| {
                let area: HtmlTextAreaElement = e.target_unchecked_into();
                Msg::Edit {
                    field: id.clone(),
                    value: area.value(),
                }
            });
            html! {
                <textarea rows={rows.to_string()} {value} {oninput}
                    placeholder={field.placeholder.clone()} disabled={locked} />
            }
        }
        InputKind::SingleLine => {
            let oninput = link.callback(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                Msg::Edit {
                    field: id.clone(),
                    value: input.value(),
                }
            });
            html! {
                <input type="text" {value} {oninput}
                    placeholder={field.placeholder.clone()} disabled={locked} />
            }
        }
    };

    html! {
        <div class="form-field">
            <label>{ &field.label }</label>
            { input }
        </div>
    }
}

fn build_net_change(component: &TeamForm) -> Html {
    let net = component.values.net_change();
    let class = if net > 0.0 {
        "positive"
    } else if net < 0.0 {
        "negative"
    } else {
        "neutral"
    };
    html! {
        <div class="net-change">
            {"Net change: "}
            <strong class={class}>{ format_signed(net) }</strong>
        </div>
    }
}

fn build_actions(component: &TeamForm, link: &Scope<TeamForm>, locked: bool) -> Html {
    let busy = component.autosave.saving() || component.submitting;
    let submitted = component.status() == SubmissionStatus::Submitted;
    html! {
        <div class="form-actions">
            <button
                class="btn"
                disabled={locked || busy}
                onclick={link.callback(|_| Msg::SaveNow)}
            >
                {"Save Now"}
            </button>
            <button
                class="btn primary"
                disabled={locked || busy || submitted}
                onclick={link.callback(|_| Msg::MarkSubmitted)}
            >
                { if component.submitting { "Submitting..." } else { "Mark as Submitted" } }
            </button>
        </div>
    }
}

fn build_history(component: &TeamForm) -> Html {
    if component.history.is_empty() {
        return html! {};
    }
    html! {
        <div class="history card">
            <h3>{"Recent weeks"}</h3>
            <ul>
                { for component.history.iter().map(history_row) }
            </ul>
        </div>
    }
}

fn history_row(submission: &Submission) -> Html {
    let week = format_week_ending(submission.week_ending);
    html! {
        <li>
            <span class="week">{ format_date(&week) }</span>
            <span class="status">{ submission.status.to_string() }</span>
            <span>{ format!("Starts {}", format_number(submission.metric("starts"))) }</span>
            <span>{ format!("Ends {}", format_number(submission.metric("ends"))) }</span>
            <span>{ format!("Net {}", format_signed(submission.net_change())) }</span>
        </li>
    }
}
