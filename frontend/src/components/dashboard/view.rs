//! View rendering for the dashboard.

use super::messages::{ExportKind, Msg};
use super::state::Dashboard;
use chrono::{DateTime, Utc};
use common::formatters::{format_date, format_relative, Freshness};
use common::model::config::Config;
use common::model::location::Location;
use common::model::submission::{format_number, format_signed, Submission};
use common::report::aggregate::WeekSummary;
use common::report::details::{metric_entries, text_entries};
use common::schedule::format_week_ending;
use num_format::{Locale, ToFormattedString};
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

/// Metric cards shown above the location grid, in order.
const SUMMARY_CARDS: [(&str, &str); 6] = [
    ("openOrders", "Open Orders"),
    ("starts", "Total Starts"),
    ("ends", "Total Ends"),
    ("candidatesInterviewed", "Candidates Interviewed"),
    ("salesMeetings", "Sales Meetings"),
    ("marketingComms", "Marketing Comms"),
];

pub fn view(component: &Dashboard, ctx: &Context<Dashboard>) -> Html {
    let link = ctx.link();
    let config = &ctx.props().config;
    let summary = component.summary(ctx.props());
    let week = format_week_ending(component.week_ending);

    let on_week = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SelectWeek(input.value())
    });

    html! {
        <div class="dashboard">
            <div class="dashboard-header">
                <h2>{ format!("Week ending {}", format_date(&week)) }</h2>
                <input type="date" value={week.clone()} onchange={on_week} />
                <button
                    class="btn"
                    disabled={component.exporting}
                    onclick={link.callback(|_| Msg::Export(ExportKind::Pdf))}
                >
                    {"Export PDF"}
                </button>
                <button
                    class="btn"
                    disabled={component.exporting}
                    onclick={link.callback(|_| Msg::Export(ExportKind::Snapshot))}
                >
                    {"Backup Data"}
                </button>
            </div>
            if component.loading {
                <div class="loading">{"Loading..."}</div>
            } else {
                { build_summary(&summary) }
                <div class="location-grid">
                    { for config.active_locations().map(|location| build_location_card(
                        link,
                        config,
                        location,
                        component.submission(&location.code),
                        component.expanded.contains(&location.code),
                    )) }
                </div>
            }
        </div>
    }
}

fn build_summary(summary: &WeekSummary) -> Html {
    let net_class = if summary.net_change > 0.0 {
        "positive"
    } else if summary.net_change < 0.0 {
        "negative"
    } else {
        "neutral"
    };
    html! {
        <div class="summary-cards">
            { for SUMMARY_CARDS.iter().map(|(id, label)| html! {
                <div class="summary-card">
                    <div class="label">{ *label }</div>
                    <div class="value">{ format_count(summary.totals.get(id)) }</div>
                </div>
            }) }
            <div class="summary-card">
                <div class="label">{"Net Change"}</div>
                <div class={classes!("value", net_class)}>{ format_signed(summary.net_change) }</div>
            </div>
            <div class="summary-card">
                <div class="label">{"Locations Submitted"}</div>
                <div class="value">{ summary.submitted_label() }</div>
            </div>
        </div>
    }
}

fn build_location_card(
    link: &Scope<Dashboard>,
    config: &Config,
    location: &Location,
    submission: Option<&Submission>,
    expanded: bool,
) -> Html {
    let now = Utc::now();
    let freshness = match submission {
        Some(s) => Freshness::of(s.status, s.last_updated_at, now),
        None => Freshness::NoData,
    };

    html! {
        <div class="location-card card">
            <div class="location-card-header">
                <h3>{ location.display_name() }</h3>
                <span class={classes!("badge", freshness.color())}>{ freshness.label() }</span>
            </div>
            <div class="location-meta">
                <div>{ format!("Lead: {}", location.lead) }</div>
                if !location.team.is_empty() {
                    <div>{ format!("Team: {}", location.team.join(", ")) }</div>
                }
                if let Some(note) = &location.note {
                    <div class="note">{ note.clone() }</div>
                }
            </div>
            {
                match submission {
                    Some(s) => build_submission(link, config, s, expanded, now),
                    None => html! { <div class="empty-state">{"No report this week"}</div> },
                }
            }
        </div>
    }
}

fn build_submission(
    link: &Scope<Dashboard>,
    config: &Config,
    submission: &Submission,
    expanded: bool,
    now: DateTime<Utc>,
) -> Html {
    let texts = text_entries(config, submission);
    let code = submission.location_code.clone();
    let toggle = link.callback(move |_| Msg::ToggleDetails(code.clone()));

    html! {
        <>
            <table class="location-metrics">
                { for metric_entries(config, submission).into_iter().map(|(label, value)| html! {
                    <tr><td>{ label }</td><td>{ format_count(value) }</td></tr>
                }) }
                <tr class="net"><td>{"Net Change"}</td><td>{ format_signed(submission.net_change()) }</td></tr>
            </table>
            <div class="updated">
                { format!(
                    "Updated {} by {}",
                    format_relative(submission.last_updated_at, now),
                    submission.last_updated_by
                ) }
            </div>
            if !texts.is_empty() {
                <button class="btn link" onclick={toggle}>
                    { if expanded { "Hide Details" } else { "Show Details" } }
                </button>
                if expanded {
                    <div class="location-details">
                        { for texts.into_iter().map(|(label, text)| html! {
                            <div class="detail">
                                <strong>{ label }</strong>
                                <p>{ text }</p>
                            </div>
                        }) }
                    </div>
                }
            }
        </>
    }
}

/// Thousands-separated whole numbers; fractional totals keep their decimals.
fn format_count(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        (n as i64).to_formatted_string(&Locale::en)
    } else {
        format_number(n)
    }
}
