use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::clients::supabase_client::CalendarStore;
use crate::error::Result;
use crate::models::login::{LoginRecord, clear_login, load_login, save_login};

/// Username/password gate with a remembered-login grace period.
pub struct AuthService<'a, S: CalendarStore> {
    store: &'a S,
}

impl<'a, S: CalendarStore> AuthService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Plain comparison against the user's settings row. Unknown users and
    /// store failures both deny.
    pub async fn verify(&self, username: &str, password: &str) -> bool {
        match self.store.find_setting(username).await {
            Ok(Some(setting)) => setting.password_matches(password),
            Ok(None) => {
                warn!("Unknown user {}", username);
                false
            }
            Err(err) => {
                error!("Login check failed: {}", err);
                false
            }
        }
    }

    /// Verifies and, on success, remembers the login at `path`.
    pub async fn login(
        &self,
        path: &Path,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if !self.verify(username, password).await {
            return Ok(false);
        }
        remember(path, username, now)?;
        info!("Logged in as {}", username);
        Ok(true)
    }
}

pub fn logged_in_user(path: &Path, now: DateTime<Utc>) -> Option<String> {
    load_login(path)
        .filter(|record| record.is_fresh(now))
        .map(|record| record.username)
}

pub fn needs_login(path: &Path, now: DateTime<Utc>) -> bool {
    logged_in_user(path, now).is_none()
}

pub fn remember(path: &Path, username: &str, now: DateTime<Utc>) -> Result<()> {
    save_login(path, &LoginRecord::new(username, now))
}

pub fn forget(path: &Path) -> Result<()> {
    clear_login(path)
}
