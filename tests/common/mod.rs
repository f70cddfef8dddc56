#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use calendarGrid::clients::supabase_client::CalendarStore;
use calendarGrid::error::{AppError, Result};
use calendarGrid::models::color::Rgba;
use calendarGrid::models::schedule::{ScheduleEvent, format_day};
use calendarGrid::models::settings::GlobalSetting;
use chrono::NaiveDate;

/// In-memory stand-in for the hosted tables.
#[derive(Default)]
pub struct FakeStore {
    pub events: Mutex<Vec<ScheduleEvent>>,
    pub settings: Mutex<Vec<GlobalSetting>>,
    pub fail: Mutex<bool>,
}

impl FakeStore {
    pub fn with_user(user_name: &str, password: &str, global_color: Option<&str>) -> Self {
        let store = FakeStore::default();
        store.settings.lock().unwrap().push(GlobalSetting {
            user_name: user_name.to_string(),
            password: Some(password.to_string()),
            global_color: global_color.map(str::to_string),
        });
        store
    }

    pub fn push_event(&self, day: &str, value: &str, color: Option<&str>) {
        self.events.lock().unwrap().push(ScheduleEvent {
            schedule_day: day.to_string(),
            schedule_value: Some(value.to_string()),
            btn_color: color.map(str::to_string),
        });
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    fn check(&self) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::Store {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.is_empty())
}

#[async_trait]
impl CalendarStore for FakeStore {
    async fn list_events(&self) -> Result<Vec<ScheduleEvent>> {
        self.check()?;
        Ok(self.events.lock().unwrap().clone())
    }

    async fn events_by_date(&self, day: NaiveDate) -> Result<Vec<ScheduleEvent>> {
        self.check()?;
        let key = format_day(day);
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.schedule_day == key)
            .cloned()
            .collect())
    }

    async fn insert_event(&self, event: &ScheduleEvent) -> Result<()> {
        self.check()?;
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn upsert_event(&self, event: &ScheduleEvent) -> Result<()> {
        self.check()?;
        let mut events = self.events.lock().unwrap();
        let mut stored = event.clone();
        if stored.btn_color.as_deref() == Some("") {
            stored.btn_color = None;
        }
        match events.iter().position(|row| row.schedule_day == event.schedule_day) {
            Some(idx) => events[idx] = stored,
            None => events.push(stored),
        }
        Ok(())
    }

    async fn clear_color_for_date(&self, day: NaiveDate) -> Result<bool> {
        self.check()?;
        let key = format_day(day);
        let mut touched = false;
        for row in self.events.lock().unwrap().iter_mut() {
            if row.schedule_day == key {
                row.btn_color = None;
                touched = true;
            }
        }
        Ok(touched)
    }

    async fn delete_empty_rows_for_date(&self, day: NaiveDate) -> Result<bool> {
        self.check()?;
        let key = format_day(day);
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|row| {
            row.schedule_day != key || !(is_blank(&row.schedule_value) && is_blank(&row.btn_color))
        });
        Ok(events.len() != before)
    }

    async fn find_setting(&self, user_name: &str) -> Result<Option<GlobalSetting>> {
        self.check()?;
        Ok(self
            .settings
            .lock()
            .unwrap()
            .iter()
            .find(|setting| setting.user_name == user_name)
            .cloned())
    }

    async fn save_global_color(&self, user_name: &str, color: Rgba) -> Result<bool> {
        self.check()?;
        let mut settings = self.settings.lock().unwrap();
        match settings.iter_mut().find(|setting| setting.user_name == user_name) {
            Some(setting) => {
                setting.global_color = Some(color.to_storage_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
