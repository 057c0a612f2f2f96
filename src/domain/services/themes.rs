#[cfg(test)]
#[path = "themes_test.rs"]
mod tests;

use anyhow::Result;

use super::Preferences;
use super::THEME_KEY;
use crate::domain::models::ThemePreference;

pub struct ThemeStore {
    preferences: Preferences,
}

impl Default for ThemeStore {
    fn default() -> ThemeStore {
        return ThemeStore::new(Preferences::default());
    }
}

impl ThemeStore {
    pub fn new(preferences: Preferences) -> ThemeStore {
        return ThemeStore { preferences };
    }

    /// Saved preference, dark when nothing usable is stored.
    pub async fn load(&self) -> ThemePreference {
        match self.preferences.get(THEME_KEY).await {
            Ok(Some(val)) => {
                return ThemePreference::parse(&val).unwrap_or_default();
            }
            Ok(None) => {
                return ThemePreference::default();
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Failed to read theme preference");
                return ThemePreference::default();
            }
        }
    }

    pub async fn set(&self, preference: ThemePreference) -> Result<()> {
        self.preferences
            .set(THEME_KEY, &preference.to_string())
            .await?;

        tracing::debug!(theme = %preference, "Theme changed");
        return Ok(());
    }
}
