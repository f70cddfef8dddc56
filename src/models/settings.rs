use serde::{Deserialize, Serialize};

use crate::models::color::Rgba;

/// Per-user row of the settings table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct GlobalSetting {
    pub user_name: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub global_color: Option<String>,
}

impl GlobalSetting {
    /// The stored global color, or the neutral default when unset or unreadable.
    pub fn color(&self) -> Rgba {
        match self.global_color.as_deref().map(str::trim) {
            None | Some("") => Rgba::DEFAULT_GLOBAL,
            Some(raw) => Rgba::parse(raw).unwrap_or_else(|err| {
                tracing::warn!("Ignoring stored global color {:?}: {}", raw, err);
                Rgba::DEFAULT_GLOBAL
            }),
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_deref() == Some(candidate)
    }
}
