use common::model::config::Config;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TeamFormProps {
    /// Current config document; the form is rebuilt whenever it changes.
    pub config: Rc<Config>,
}
