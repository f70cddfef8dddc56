use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::clients::supabase_client::{DEFAULT_EVENTS_TABLE, DEFAULT_SETTINGS_TABLE, SupabaseConfig};
use crate::error::{AppError, Result};
use crate::handlers::terminal::{DEFAULT_WEEKDAY_LABELS, WeekdayLabels};
use crate::models::login::DEFAULT_LOGIN_FILE;

const DEFAULT_RUN_MODE: &str = "cli";
const DEFAULT_TIMEZONE: &str = "Asia/Seoul";
const DEFAULT_API_PORT: u16 = 8080;

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(AppError::Config(format!(
                    "Invalid config line {}: {}",
                    idx + 1,
                    line
                )));
            };
            values.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the process environment.
    pub fn get_prop(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }

    fn require(&self, key: &str) -> Result<String> {
        self.get_prop(key)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Config(format!("{key} must be set")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Cli,
    Api,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub supabase: SupabaseConfig,
    pub login_file: PathBuf,
    pub timezone: Tz,
    pub weekday_labels: WeekdayLabels,
    pub run_mode: RunMode,
    pub api_port: u16,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let supabase = SupabaseConfig {
            url: config.require("SUPABASE_URL")?,
            api_key: config.require("SUPABASE_KEY")?,
            events_table: config
                .get_prop("EVENTS_TABLE")
                .unwrap_or(DEFAULT_EVENTS_TABLE.to_string()),
            settings_table: config
                .get_prop("SETTINGS_TABLE")
                .unwrap_or(DEFAULT_SETTINGS_TABLE.to_string()),
        };

        let timezone_name = config
            .get_prop("TIMEZONE")
            .unwrap_or(DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| AppError::Config(format!("Unknown TIMEZONE {timezone_name}")))?;

        let weekday_labels = match config.get_prop("WEEKDAY_LABELS") {
            Some(raw) => parse_weekday_labels(&raw)?,
            None => DEFAULT_WEEKDAY_LABELS.map(str::to_string),
        };

        let run_mode = match config
            .get_prop("RUN_MODE")
            .unwrap_or(DEFAULT_RUN_MODE.to_string())
            .as_str()
        {
            "cli" => RunMode::Cli,
            "api" => RunMode::Api,
            other => return Err(AppError::Config(format!("Invalid run mode {other}"))),
        };

        let api_port = match config.get_prop("API_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid API_PORT {raw}")))?,
            None => DEFAULT_API_PORT,
        };

        Ok(Self {
            supabase,
            login_file: PathBuf::from(
                config
                    .get_prop("LOGIN_FILE")
                    .unwrap_or(DEFAULT_LOGIN_FILE.to_string()),
            ),
            timezone,
            weekday_labels,
            run_mode,
            api_port,
        })
    }

    pub fn today(&self) -> chrono::NaiveDate {
        chrono::Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// Strips one pair of matching single or double quotes around a value.
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(value)
}

fn parse_weekday_labels(raw: &str) -> Result<WeekdayLabels> {
    let labels: Vec<String> = raw.split(',').map(|label| label.trim().to_string()).collect();
    labels.try_into().map_err(|labels: Vec<String>| {
        AppError::Config(format!(
            "WEEKDAY_LABELS needs 7 labels, found {}",
            labels.len()
        ))
    })
}
