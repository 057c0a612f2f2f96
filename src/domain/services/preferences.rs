#[cfg(test)]
#[path = "preferences_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use once_cell::sync::Lazy;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use toml_edit::value;
use toml_edit::Document;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub const THEME_KEY: &str = "theme";
pub const SESSION_KEY: &str = "session";

// Held across every read-modify-write so concurrent updates can't drop keys.
static WRITES: Lazy<Mutex<()>> = Lazy::new(|| return Mutex::new(()));

/// Small persisted key-value store, one TOML string per key.
#[derive(Clone)]
pub struct Preferences {
    pub file_path: path::PathBuf,
}

impl Default for Preferences {
    fn default() -> Preferences {
        return Preferences::new(path::PathBuf::from(Config::get(
            ConfigKey::PreferencesFile,
        )));
    }
}

impl Preferences {
    pub fn new(file_path: path::PathBuf) -> Preferences {
        return Preferences { file_path };
    }

    async fn read(&self) -> Result<Document> {
        if !self.file_path.exists() {
            return Ok(Document::new());
        }

        let payload = fs::read_to_string(&self.file_path).await?;
        return Ok(payload.parse::<Document>()?);
    }

    /// Writes next to the target and renames over it, so readers see either
    /// the old file or the new one.
    async fn write(&self, doc: Document) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut staged = self.file_path.clone().into_os_string();
        staged.push(".tmp");
        let staged = path::PathBuf::from(staged);

        let mut file = fs::File::create(&staged).await?;
        file.write_all(doc.to_string().as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&staged, &self.file_path).await?;

        return Ok(());
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let doc = self.read().await?;
        let res = doc
            .get(key)
            .and_then(|e| return e.as_str())
            .map(|e| return e.to_string());

        return Ok(res);
    }

    pub async fn set(&self, key: &str, val: &str) -> Result<()> {
        let _guard = WRITES.lock().await;
        let mut doc = self.read().await?;
        doc[key] = value(val);
        self.write(doc).await?;

        tracing::debug!(key = key, path = ?self.file_path, "Saved preference");
        return Ok(());
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        let _guard = WRITES.lock().await;
        if !self.file_path.exists() {
            return Ok(());
        }

        let mut doc = self.read().await?;
        doc.remove(key);
        self.write(doc).await?;

        return Ok(());
    }
}
