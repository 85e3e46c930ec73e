use super::messages::Msg;
use super::state::ConfigEditor;
use crate::components::helpers::show_toast;
use yew::platform::spawn_local;
use yew::prelude::*;

pub fn update(component: &mut ConfigEditor, ctx: &Context<ConfigEditor>, msg: Msg) -> bool {
    match msg {
        Msg::SetTab(tab) => {
            component.tab = tab;
            true
        }
        Msg::Edit(edit) => match edit.apply(&mut component.draft) {
            Ok(()) => {
                component.dirty = true;
                true
            }
            Err(e) => {
                show_toast(&e.to_string());
                false
            }
        },
        Msg::Save => {
            if component.saving {
                return false;
            }
            if let Err(e) = component.draft.validate() {
                show_toast(&format!("Cannot save: {}", e));
                return false;
            }
            component.saving = true;
            let api = component.api.clone();
            let link = ctx.link().clone();
            let draft = component.draft.clone();
            spawn_local(async move {
                let result = api.update_config(&draft).await;
                link.send_message(Msg::Saved(result));
            });
            true
        }
        Msg::Saved(result) => {
            component.saving = false;
            match result {
                Ok(config) => {
                    component.draft = config;
                    component.dirty = false;
                    show_toast("Configuration saved successfully!");
                }
                Err(e) => {
                    gloo_console::error!(format!("config update failed: {}", e));
                    show_toast(&format!("Error saving configuration: {}", e));
                }
            }
            true
        }
        Msg::Discard => {
            component.draft = ctx.props().config.as_ref().clone();
            component.dirty = false;
            true
        }
    }
}
