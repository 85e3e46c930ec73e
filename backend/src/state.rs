//! Shared application state handed to every handler as `web::Data<AppState>`.

use crate::change_feed::ChangeFeed;
use crate::config::ServerSettings;
use crate::store::Store;
use common::model::config::{Config, ConfigError};
use common::schedule::LockRule;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub feed: ChangeFeed,
    pub settings: Arc<ServerSettings>,
}

impl AppState {
    pub fn new(store: Store, settings: ServerSettings) -> Self {
        Self {
            store: Arc::new(store),
            feed: ChangeFeed::new(settings.feed_capacity),
            settings: Arc::new(settings),
        }
    }

    /// Lock rule for `config`, evaluated in the server's configured offset.
    pub fn lock_rule(&self, config: &Config) -> Result<LockRule, ConfigError> {
        LockRule::from_settings(&config.settings, self.settings.lock_offset())
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        let store = Store::open_in_memory().expect("in-memory store");
        Self::new(store, ServerSettings::default())
    }
}
