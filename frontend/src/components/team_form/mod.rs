//! Team member form: one location's weekly metrics and notes.
//!
//! The inputs come from the config document. Edits are persisted by the
//! debounced auto-save controller from `common::autosave`; the component only
//! owns the browser timer and the live subscription to the stored document.
//! Both are released when the component is destroyed.

use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::TeamFormProps;
pub use state::TeamForm;

impl Component for TeamForm {
    type Message = Msg;
    type Properties = TeamFormProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut component = TeamForm::new(ctx);
        update::open(&mut component, ctx);
        component
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        update::config_changed(self, ctx);
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.timer.take();
        self.subscription.take();
    }
}
