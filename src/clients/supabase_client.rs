use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::color::Rgba;
use crate::models::schedule::{ScheduleEvent, format_day};
use crate::models::settings::GlobalSetting;

pub const DEFAULT_EVENTS_TABLE: &str = "minsik_calender";
pub const DEFAULT_SETTINGS_TABLE: &str = "global_setting";

/// Row store behind the calendar: one table of schedule rows and one of
/// per-user settings.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn list_events(&self) -> Result<Vec<ScheduleEvent>>;
    async fn events_by_date(&self, day: NaiveDate) -> Result<Vec<ScheduleEvent>>;
    /// Adds another row for the event's day, keeping any existing ones.
    async fn insert_event(&self, event: &ScheduleEvent) -> Result<()>;
    /// Insert or replace the row keyed by `schedule_day`.
    async fn upsert_event(&self, event: &ScheduleEvent) -> Result<()>;
    async fn clear_color_for_date(&self, day: NaiveDate) -> Result<bool>;
    /// Deletes rows for `day` whose text and color are both null or empty.
    async fn delete_empty_rows_for_date(&self, day: NaiveDate) -> Result<bool>;
    async fn find_setting(&self, user_name: &str) -> Result<Option<GlobalSetting>>;
    async fn save_global_color(&self, user_name: &str, color: Rgba) -> Result<bool>;

    async fn event_by_date(&self, day: NaiveDate) -> Result<Option<ScheduleEvent>> {
        Ok(self.events_by_date(day).await?.into_iter().next())
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub api_key: String,
    pub events_table: String,
    pub settings_table: String,
}

/// PostgREST client for a hosted Supabase project.
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url.trim_end_matches('/'), table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }

    fn events(&self, method: Method) -> RequestBuilder {
        let url = self.table_url(&self.config.events_table);
        self.authorized(self.http.request(method, url))
    }

    fn settings(&self, method: Method) -> RequestBuilder {
        let url = self.table_url(&self.config.settings_table);
        self.authorized(self.http.request(method, url))
    }

    fn list_events_request(&self) -> Result<Request> {
        Ok(self.events(Method::GET).query(&[("select", "*")]).build()?)
    }

    fn events_by_date_request(&self, day: NaiveDate) -> Result<Request> {
        Ok(self
            .events(Method::GET)
            .query(&[("select", "*".to_string()), day_filter(day)])
            .build()?)
    }

    fn insert_request(&self, event: &ScheduleEvent) -> Result<Request> {
        Ok(self.events(Method::POST).json(&row_body(event)).build()?)
    }

    fn upsert_request(&self, event: &ScheduleEvent) -> Result<Request> {
        Ok(self
            .events(Method::POST)
            .query(&[("on_conflict", "schedule_day")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&row_body(event))
            .build()?)
    }

    fn clear_color_request(&self, day: NaiveDate) -> Result<Request> {
        Ok(self
            .events(Method::PATCH)
            .query(&[day_filter(day)])
            .header("Prefer", "return=representation")
            .json(&json!({ "btn_color": null }))
            .build()?)
    }

    fn delete_empty_request(&self, day: NaiveDate) -> Result<Request> {
        Ok(self
            .events(Method::DELETE)
            .query(&[day_filter(day), ("and", EMPTY_ROW_FILTER.to_string())])
            .header("Prefer", "return=representation")
            .build()?)
    }

    fn find_setting_request(&self, user_name: &str) -> Result<Request> {
        Ok(self
            .settings(Method::GET)
            .query(&[("select", "*".to_string()), ("user_name", format!("eq.{user_name}"))])
            .build()?)
    }

    fn save_global_color_request(&self, user_name: &str, color: Rgba) -> Result<Request> {
        Ok(self
            .settings(Method::PATCH)
            .query(&[("user_name", format!("eq.{user_name}"))])
            .header("Prefer", "return=representation")
            .json(&json!({ "global_color": color.to_storage_string() }))
            .build()?)
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        Self::checked(self.http.execute(request).await?).await
    }

    async fn rows<T: DeserializeOwned>(&self, request: Request) -> Result<Vec<T>> {
        let text = self.execute(request).await?.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn checked(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Store {
            status: status.as_u16(),
            body,
        })
    }
}

/// PostgREST filter matching rows with neither text nor color.
const EMPTY_ROW_FILTER: &str =
    "(or(schedule_value.is.null,schedule_value.eq.\"\"),or(btn_color.is.null,btn_color.eq.\"\"))";

fn day_filter(day: NaiveDate) -> (&'static str, String) {
    ("schedule_day", format!("eq.{}", format_day(day)))
}

/// Row JSON as written to the store; a blank color is stored as null.
fn row_body(event: &ScheduleEvent) -> serde_json::Value {
    let color = event
        .btn_color
        .as_deref()
        .filter(|value| !value.trim().is_empty());
    json!({
        "schedule_day": event.schedule_day,
        "schedule_value": event.schedule_value,
        "btn_color": color,
    })
}

#[async_trait]
impl CalendarStore for SupabaseClient {
    async fn list_events(&self) -> Result<Vec<ScheduleEvent>> {
        let rows: Vec<ScheduleEvent> = self.rows(self.list_events_request()?).await?;
        debug!("Fetched {} schedule rows", rows.len());
        Ok(rows)
    }

    async fn events_by_date(&self, day: NaiveDate) -> Result<Vec<ScheduleEvent>> {
        self.rows(self.events_by_date_request(day)?).await
    }

    async fn insert_event(&self, event: &ScheduleEvent) -> Result<()> {
        self.execute(self.insert_request(event)?).await?;
        info!("Inserted schedule row for {}", event.schedule_day);
        Ok(())
    }

    async fn upsert_event(&self, event: &ScheduleEvent) -> Result<()> {
        self.execute(self.upsert_request(event)?).await?;
        info!("Upserted schedule row for {}", event.schedule_day);
        Ok(())
    }

    async fn clear_color_for_date(&self, day: NaiveDate) -> Result<bool> {
        let updated: Vec<ScheduleEvent> = self.rows(self.clear_color_request(day)?).await?;
        Ok(!updated.is_empty())
    }

    async fn delete_empty_rows_for_date(&self, day: NaiveDate) -> Result<bool> {
        let deleted: Vec<ScheduleEvent> = self.rows(self.delete_empty_request(day)?).await?;
        if deleted.is_empty() {
            debug!("No empty rows to delete for {}", day);
        } else {
            info!("Deleted {} empty rows for {}", deleted.len(), day);
        }
        Ok(!deleted.is_empty())
    }

    async fn find_setting(&self, user_name: &str) -> Result<Option<GlobalSetting>> {
        let rows: Vec<GlobalSetting> = self.rows(self.find_setting_request(user_name)?).await?;
        Ok(rows.into_iter().next())
    }

    async fn save_global_color(&self, user_name: &str, color: Rgba) -> Result<bool> {
        let request = self.save_global_color_request(user_name, color)?;
        let updated: Vec<GlobalSetting> = self.rows(request).await?;
        Ok(!updated.is_empty())
    }
}
