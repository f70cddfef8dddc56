use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::color::Rgba;

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// One row of the events table. Several rows may share a `schedule_day`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ScheduleEvent {
    pub schedule_day: String,
    #[serde(default)]
    pub schedule_value: Option<String>,
    #[serde(default)]
    pub btn_color: Option<String>,
}

impl ScheduleEvent {
    pub fn new(day: NaiveDate, value: &str, color: Option<Rgba>) -> Self {
        Self {
            schedule_day: format_day(day),
            schedule_value: Some(value.to_string()),
            btn_color: color.map(|c| c.to_storage_string()),
        }
    }

    /// Date-only part of `schedule_day`; any time-of-day suffix is ignored.
    pub fn day(&self) -> Option<NaiveDate> {
        let prefix = self.schedule_day.get(..10)?;
        NaiveDate::parse_from_str(prefix, DAY_FORMAT).ok()
    }

    pub fn text(&self) -> &str {
        self.schedule_value.as_deref().unwrap_or("")
    }

    pub fn color_or(&self, fallback: Rgba) -> Rgba {
        Rgba::resolve_stored(self.btn_color.as_deref(), fallback)
    }
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}
