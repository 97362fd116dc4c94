//! The visual theme chosen by the user
//!
//! The theme is stored as a raw string under the `theme` key, so that any front-end can interpret it.

use std::error::Error;
use std::sync::Arc;

use crate::config::THEME_KEY;
use crate::storage::KeyValueStore;

pub struct ThemeSettings {
    storage: Arc<dyn KeyValueStore>,
}

impl ThemeSettings {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// The persisted theme name, if any
    pub fn theme(&self) -> Option<String> {
        match self.storage.get(THEME_KEY) {
            Ok(theme) => theme.filter(|name| name.trim().is_empty() == false),
            Err(err) => {
                log::warn!("Unable to read the theme: {}", err);
                None
            },
        }
    }

    pub fn set_theme(&self, name: &str) -> Result<(), Box<dyn Error>> {
        let name = name.trim();
        if name.is_empty() {
            return Err("A theme name cannot be empty".into());
        }
        self.storage.set(THEME_KEY, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn theme_roundtrip() {
        let settings = ThemeSettings::new(Arc::new(MemoryStorage::new()));
        assert_eq!(settings.theme(), None);

        settings.set_theme("dracula").unwrap();
        assert_eq!(settings.theme().as_deref(), Some("dracula"));

        assert!(settings.set_theme("  ").is_err());
        assert_eq!(settings.theme().as_deref(), Some("dracula"));
    }
}
