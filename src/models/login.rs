use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

pub const DEFAULT_LOGIN_FILE: &str = "./data/login_info.json";
pub const LOGIN_GRACE_DAYS: i64 = 90;

/// Remembered login, persisted as `{"lastLogin": ..., "username": ...}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    pub last_login: DateTime<Utc>,
    pub username: String,
}

impl LoginRecord {
    pub fn new(username: &str, now: DateTime<Utc>) -> Self {
        Self {
            last_login: now,
            username: username.to_string(),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.last_login <= Duration::days(LOGIN_GRACE_DAYS)
    }
}

/// A missing or corrupt file is the same as never having logged in.
pub fn load_login(path: &Path) -> Option<LoginRecord> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            debug!("No login record at {}: {}", path.display(), err);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!("Discarding unreadable login record {}: {}", path.display(), err);
            None
        }
    }
}

pub fn save_login(path: &Path, record: &LoginRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let body = serde_json::to_string_pretty(record)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn clear_login(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn freshness_allows_exactly_ninety_days() {
        let login = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let record = LoginRecord::new("minsik", login);
        assert!(record.is_fresh(login + Duration::days(90)));
        assert!(!record.is_fresh(login + Duration::days(90) + Duration::seconds(1)));
    }

    #[test]
    fn uses_camel_case_keys() {
        let login = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let json = serde_json::to_value(LoginRecord::new("minsik", login)).unwrap();
        assert_eq!(json["username"], "minsik");
        assert!(json["lastLogin"].as_str().unwrap().starts_with("2026-01-01T09:00:00"));
    }
}
