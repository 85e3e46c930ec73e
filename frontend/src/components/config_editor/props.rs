use common::model::config::Config;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ConfigEditorProps {
    pub config: Rc<Config>,
}
