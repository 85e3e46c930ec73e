use super::messages::{ExportKind, Msg};
use super::state::Dashboard;
use crate::components::helpers::{alert, save_file, show_toast};
use chrono::Local;
use common::schedule::{format_week_ending, parse_week_ending};
use yew::platform::spawn_local;
use yew::prelude::*;

pub fn update(component: &mut Dashboard, ctx: &Context<Dashboard>, msg: Msg) -> bool {
    match msg {
        Msg::SelectWeek(raw) => match parse_week_ending(&raw) {
            Some(week) if week != component.week_ending => {
                component.week_ending = week;
                open(component, ctx);
                true
            }
            _ => false,
        },
        Msg::Week(submissions) => {
            component.loading = false;
            component.submissions = submissions;
            true
        }
        Msg::ToggleDetails(code) => {
            if !component.expanded.remove(&code) {
                component.expanded.insert(code);
            }
            true
        }
        Msg::Export(kind) => {
            if component.exporting {
                return false;
            }
            component.exporting = true;
            let (path, fallback) = match kind {
                ExportKind::Pdf => {
                    let week = format_week_ending(component.week_ending);
                    (
                        format!("/api/export/pdf/{}", week),
                        format!("KPI_Report_{}.pdf", week),
                    )
                }
                ExportKind::Snapshot => (
                    "/api/export/snapshot".to_string(),
                    format!("kpi_backup_{}.json", Local::now().format("%Y-%m-%d")),
                ),
            };
            let api = component.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api.download(&path, &fallback).await;
                link.send_message(Msg::Exported(result));
            });
            true
        }
        Msg::Exported(result) => {
            component.exporting = false;
            match result.and_then(|download| save_file(&download).map(|_| download.filename)) {
                Ok(filename) => show_toast(&format!("Downloaded {}", filename)),
                Err(e) => {
                    gloo_console::error!(format!("export failed: {}", e));
                    alert(&format!("Export failed: {}", e));
                }
            }
            true
        }
    }
}

/// Replaces the week subscription with one for the selected week.
pub fn open(component: &mut Dashboard, ctx: &Context<Dashboard>) {
    component.subscription = None;
    component.submissions.clear();
    let path = format!(
        "/api/submissions/week/{}/subscribe",
        format_week_ending(component.week_ending)
    );
    match component.api.subscribe(&path, ctx.link().callback(Msg::Week)) {
        Ok(subscription) => {
            component.loading = true;
            component.subscription = Some(subscription);
        }
        Err(e) => {
            component.loading = false;
            gloo_console::error!(format!("cannot subscribe to {}: {}", path, e));
        }
    }
}
