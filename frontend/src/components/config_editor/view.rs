//! View rendering for the config editor.
//!
//! Every input emits a [`ConfigEdit`]; the team list is typed as a comma
//! separated string and built-in field ids are shown read-only.

use super::messages::{Msg, Tab};
use super::state::ConfigEditor;
use crate::components::helpers::now_ms;
use common::config_editor::{
    ConfigEdit, FieldChange, LocationField, SettingsChange, MAX_ROWS, MIN_ROWS,
};
use common::model::form::{FieldType, FormField, FormSection};
use common::model::location::Location;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn view(component: &ConfigEditor, ctx: &Context<ConfigEditor>) -> Html {
    let link = ctx.link();
    html! {
        <div class="config-editor">
            <div class="tab-bar">
                { tab_button(component, link, Tab::Locations, "Locations") }
                { tab_button(component, link, Tab::Sections, "Form Sections") }
                { tab_button(component, link, Tab::Settings, "Settings") }
            </div>
            {
                match component.tab {
                    Tab::Locations => build_locations(component, link),
                    Tab::Sections => build_sections(component, link),
                    Tab::Settings => build_settings(component, link),
                }
            }
            <div class="form-actions">
                <button
                    class="btn"
                    disabled={!component.dirty || component.saving}
                    onclick={link.callback(|_| Msg::Discard)}
                >
                    {"Discard Changes"}
                </button>
                <button
                    class="btn primary"
                    disabled={!component.dirty || component.saving}
                    onclick={link.callback(|_| Msg::Save)}
                >
                    { if component.saving { "Saving..." } else { "Save Configuration" } }
                </button>
            </div>
        </div>
    }
}

fn tab_button(
    component: &ConfigEditor,
    link: &Scope<ConfigEditor>,
    tab: Tab,
    label: &'static str,
) -> Html {
    html! {
        <button
            class={classes!("tab-btn", (component.tab == tab).then_some("active"))}
            onclick={link.callback(move |_| Msg::SetTab(tab))}
        >
            { label }
        </button>
    }
}

/// Text input emitting an edit built from its current value.
fn text_input<F>(link: &Scope<ConfigEditor>, value: String, placeholder: &str, to_edit: F) -> Html
where
    F: Fn(String) -> ConfigEdit + 'static,
{
    let onchange = link.callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::Edit(to_edit(input.value()))
    });
    html! { <input type="text" {value} placeholder={placeholder.to_string()} {onchange} /> }
}

fn build_locations(component: &ConfigEditor, link: &Scope<ConfigEditor>) -> Html {
    html! {
        <div class="config-locations">
            { for component.draft.locations.iter().enumerate().map(|(index, location)| location_row(link, index, location)) }
            <button class="btn" onclick={link.callback(|_| Msg::Edit(ConfigEdit::AddLocation))}>
                {"Add Location"}
            </button>
        </div>
    }
}

fn location_row(link: &Scope<ConfigEditor>, index: usize, location: &Location) -> Html {
    let update = move |field: LocationField| {
        move |value: String| ConfigEdit::UpdateLocation {
            index,
            field,
            value,
        }
    };

    html! {
        <div class={classes!("config-row", (!location.enabled).then_some("disabled"))}>
            { text_input(link, location.code.clone(), "Code", update(LocationField::Code)) }
            { text_input(link, location.name.clone(), "Name", update(LocationField::Name)) }
            { text_input(link, location.lead.clone(), "Lead", update(LocationField::Lead)) }
            { text_input(link, location.team.join(", "), "Team (comma separated)", update(LocationField::Team)) }
            { text_input(link, location.note.clone().unwrap_or_default(), "Note", update(LocationField::Note)) }
            <button class="btn" onclick={link.callback(move |_| Msg::Edit(ConfigEdit::ToggleLocation(index)))}>
                { if location.enabled { "Disable" } else { "Enable" } }
            </button>
            <button class="btn danger" onclick={link.callback(move |_| Msg::Edit(ConfigEdit::RemoveLocation(index)))}>
                {"Remove"}
            </button>
        </div>
    }
}

fn build_sections(component: &ConfigEditor, link: &Scope<ConfigEditor>) -> Html {
    html! {
        <div class="config-sections">
            { for component.draft.form_sections.iter().map(|(id, section)| section_card(link, id, section)) }
        </div>
    }
}

fn section_card(link: &Scope<ConfigEditor>, id: &str, section: &FormSection) -> Html {
    let rename = {
        let section_id = id.to_string();
        move |title: String| ConfigEdit::RenameSection {
            section: section_id.clone(),
            title,
        }
    };
    let toggle = {
        let section = id.to_string();
        link.callback(move |_| Msg::Edit(ConfigEdit::ToggleSection(section.clone())))
    };
    let add_field = {
        let section = id.to_string();
        link.callback(move |_| {
            Msg::Edit(ConfigEdit::AddField {
                section: section.clone(),
                now_millis: now_ms() as i64,
            })
        })
    };

    html! {
        <div class={classes!("section-card", "card", (!section.enabled).then_some("disabled"))}>
            <div class="section-header">
                { text_input(link, section.title.clone(), "Section title", rename) }
                <button class="btn" onclick={toggle}>
                    { if section.enabled { "Disable Section" } else { "Enable Section" } }
                </button>
            </div>
            { for section.fields.iter().enumerate().map(|(index, field)| field_row(link, id, index, field)) }
            <button class="btn" onclick={add_field}>{"Add Field"}</button>
        </div>
    }
}

fn field_row(link: &Scope<ConfigEditor>, section: &str, index: usize, field: &FormField) -> Html {
    let change = {
        let section = section.to_string();
        move |make: fn(String) -> FieldChange| {
            let section = section.clone();
            move |value: String| ConfigEdit::UpdateField {
                section: section.clone(),
                index,
                change: make(value),
            }
        }
    };

    let on_type = {
        let section = section.to_string();
        link.batch_callback(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            FieldType::parse(&select.value()).map(|field_type| {
                Msg::Edit(ConfigEdit::UpdateField {
                    section: section.clone(),
                    index,
                    change: FieldChange::Type(field_type),
                })
            })
        })
    };
    let on_rows = {
        let section = section.to_string();
        link.batch_callback(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            input.value().parse::<u32>().ok().map(|rows| {
                Msg::Edit(ConfigEdit::UpdateField {
                    section: section.clone(),
                    index,
                    change: FieldChange::Rows(rows),
                })
            })
        })
    };
    let toggle = {
        let section = section.to_string();
        link.callback(move |_| {
            Msg::Edit(ConfigEdit::ToggleField {
                section: section.clone(),
                index,
            })
        })
    };
    let remove = {
        let section = section.to_string();
        link.callback(move |_| {
            Msg::Edit(ConfigEdit::RemoveField {
                section: section.clone(),
                index,
            })
        })
    };

    html! {
        <div class={classes!("config-row", (!field.enabled).then_some("disabled"))}>
            if field.is_custom() {
                { text_input(link, field.id.clone(), "Field id", change(FieldChange::Id)) }
            } else {
                <input type="text" value={field.id.clone()} readonly=true title="Built-in field ids cannot be changed" />
            }
            { text_input(link, field.label.clone(), "Label", change(FieldChange::Label)) }
            <select onchange={on_type}>
                { for FieldType::ALL.iter().map(|t| html! {
                    <option value={t.as_str()} selected={*t == field.field_type}>{ t.as_str() }</option>
                }) }
            </select>
            { text_input(link, field.placeholder.clone().unwrap_or_default(), "Placeholder", change(FieldChange::Placeholder)) }
            if field.field_type == FieldType::Textarea {
                <input
                    type="number"
                    min={MIN_ROWS.to_string()}
                    max={MAX_ROWS.to_string()}
                    value={field.rows.unwrap_or(3).to_string()}
                    onchange={on_rows}
                />
            }
            <button class="btn" onclick={toggle}>
                { if field.enabled { "Disable" } else { "Enable" } }
            </button>
            <button class="btn danger" onclick={remove}>{"Remove"}</button>
        </div>
    }
}

fn build_settings(component: &ConfigEditor, link: &Scope<ConfigEditor>) -> Html {
    let settings = &component.draft.settings;
    let on_interval = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input
            .value()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(|secs| Msg::Edit(ConfigEdit::Settings(SettingsChange::AutoSaveInterval(secs * 1000))))
    });
    let on_day = link.batch_callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        select
            .value()
            .parse::<u8>()
            .ok()
            .map(|day| Msg::Edit(ConfigEdit::Settings(SettingsChange::DeadlineDay(day))))
    });
    let on_time = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::Edit(ConfigEdit::Settings(SettingsChange::DeadlineTime(input.value())))
    });

    html! {
        <div class="config-settings">
            <label>
                {"Auto-save interval (seconds)"}
                <input
                    type="number"
                    min="1"
                    value={(settings.auto_save_interval / 1000).to_string()}
                    onchange={on_interval}
                />
            </label>
            <label>
                {"Deadline day"}
                <select onchange={on_day}>
                    { for WEEKDAYS.iter().enumerate().map(|(day, name)| html! {
                        <option value={day.to_string()} selected={day == usize::from(settings.deadline_day)}>
                            { *name }
                        </option>
                    }) }
                </select>
            </label>
            <label>
                {"Deadline time"}
                <input type="time" value={settings.deadline_time.clone()} onchange={on_time} />
            </label>
        </div>
    }
}
