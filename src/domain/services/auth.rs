#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;

use super::Preferences;
use super::SESSION_KEY;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiError;
use crate::infrastructure::api::ApiBox;

pub const LOGIN_FAILED_TEXT: &str = "Login failed. Please try again.";
pub const LOGOUT_FAILED_TEXT: &str = "Logout failed. Please try again.";
pub const LOGOUT_ERROR_TEXT: &str = "An error occurred during logout. Please try again.";

/// What to tell the user about a logout attempt. `None` means it worked.
pub fn logout_message(res: &Result<bool, ApiError>) -> Option<&'static str> {
    match res {
        Ok(true) => return None,
        Ok(false) => return Some(LOGOUT_FAILED_TEXT),
        Err(_) => return Some(LOGOUT_ERROR_TEXT),
    }
}

/// Keeps the backend session cookie in the preferences file.
pub struct SessionStore {
    preferences: Preferences,
}

impl Default for SessionStore {
    fn default() -> SessionStore {
        return SessionStore::new(Preferences::default());
    }
}

impl SessionStore {
    pub fn new(preferences: Preferences) -> SessionStore {
        return SessionStore { preferences };
    }

    /// Loads the stored cookie into config unless one was passed explicitly.
    pub async fn restore(&self) -> Result<()> {
        if !Config::get(ConfigKey::SessionCookie).is_empty() {
            return Ok(());
        }

        if let Some(cookie) = self.preferences.get(SESSION_KEY).await? {
            Config::set(ConfigKey::SessionCookie, &cookie);
        }

        return Ok(());
    }

    pub async fn save(&self, cookie: &str) -> Result<()> {
        self.preferences.set(SESSION_KEY, cookie).await?;
        Config::set(ConfigKey::SessionCookie, cookie);
        return Ok(());
    }

    pub async fn forget(&self) -> Result<()> {
        self.preferences.remove(SESSION_KEY).await?;
        Config::set(ConfigKey::SessionCookie, "");
        return Ok(());
    }
}

pub struct AuthService {
    api: ApiBox,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(api: ApiBox, sessions: SessionStore) -> AuthService {
        return AuthService { api, sessions };
    }

    pub async fn login(&self, token: &str, referral_code: &str) -> Result<()> {
        let cookie = match self.api.sign_in(token, referral_code).await {
            Ok(res) => res.cookie,
            Err(err) => {
                tracing::error!(error = ?err, "Sign in failed");
                bail!(LOGIN_FAILED_TEXT);
            }
        };

        match cookie {
            Some(cookie) => self.sessions.save(&cookie).await?,
            None => {
                tracing::error!("Sign in succeeded without a session cookie");
                bail!(LOGIN_FAILED_TEXT);
            }
        }

        tracing::info!("Signed in");
        return Ok(());
    }

    pub async fn logout(&self) -> Result<()> {
        let res = self.api.logout().await;
        if let Err(err) = &res {
            tracing::error!(error = ?err, "Logout failed");
        }
        if let Some(message) = logout_message(&res) {
            bail!(message);
        }

        self.sessions.forget().await?;
        return Ok(());
    }
}
