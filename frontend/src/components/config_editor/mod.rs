//! Config editor: locations, form sections and auto-save settings.
//!
//! Edits go to a working copy of the config through
//! [`common::config_editor::ConfigEdit`]. Nothing reaches the server until
//! "Save Configuration"; while the copy is clean it follows the live config.

use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::ConfigEditorProps;
pub use state::ConfigEditor;

impl Component for ConfigEditor {
    type Message = Msg;
    type Properties = ConfigEditorProps;

    fn create(ctx: &Context<Self>) -> Self {
        ConfigEditor::new(ctx)
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        if !self.dirty {
            self.draft = ctx.props().config.as_ref().clone();
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
