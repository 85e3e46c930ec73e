use super::{Store, StoreError};
use common::model::config::Config;
use rusqlite::{params, OptionalExtension};

/// Row id of the singleton config document.
const CONFIG_DOC_ID: &str = "app-config";

impl Store {
    /// Returns the stored config, writing the defaults first if none exists.
    pub fn load_config(&self) -> Result<Config, StoreError> {
        let conn = self.conn()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM settings WHERE id = ?1",
                params![CONFIG_DOC_ID],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(raw) => Ok(Config::from_json(&raw)?),
            None => {
                let config = Config::default();
                let raw = serde_json::to_string(&config).map_err(StoreError::Encode)?;
                conn.execute(
                    "INSERT INTO settings (id, body, updated_at) VALUES (?1, ?2, datetime('now'))",
                    params![CONFIG_DOC_ID, raw],
                )?;
                log::info!("initialized default configuration");
                Ok(config)
            }
        }
    }

    /// Replaces the config document. The caller validates it first.
    pub fn save_config(&self, config: &Config) -> Result<(), StoreError> {
        let raw = serde_json::to_string(config).map_err(StoreError::Encode)?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO settings (id, body, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![CONFIG_DOC_ID, raw],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_read_initializes_defaults() {
        let store = Store::open_in_memory().unwrap();
        let config = store.load_config().unwrap();
        assert_eq!(config, Config::default());

        let count: i64 = store
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn saved_config_is_returned() {
        let store = Store::open_in_memory().unwrap();
        let mut config = store.load_config().unwrap();
        config.locations[2].enabled = false;
        config.settings.auto_save_interval = 15_000;
        store.save_config(&config).unwrap();
        assert_eq!(store.load_config().unwrap(), config);
    }

    #[test]
    fn corrupt_config_is_reported() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO settings (id, body, updated_at) VALUES (?1, ?2, '')",
                params![CONFIG_DOC_ID, r#"{"formSections": {"s": {"title": "S", "fields": [{"id": "a", "label": "A", "type": "slider"}]}}}"#],
            )
            .unwrap();
        assert!(matches!(store.load_config(), Err(StoreError::Config(_))));
    }
}
