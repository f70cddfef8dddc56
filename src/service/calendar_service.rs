use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::clients::supabase_client::CalendarStore;
use crate::models::color::Rgba;
use crate::models::schedule::{ScheduleEvent, format_day};
use crate::service::grid::{MonthGrid, YearMonth, build_month_grid};

/// Everything the calendar window keeps between user actions.
#[derive(Debug, Clone)]
pub struct AppState {
    pub username: String,
    pub global_color: Rgba,
    pub cursor: YearMonth,
    pub events: Vec<ScheduleEvent>,
}

impl AppState {
    pub fn new(username: &str, cursor: YearMonth) -> Self {
        Self {
            username: username.to_string(),
            global_color: Rgba::DEFAULT_GLOBAL,
            cursor,
            events: Vec::new(),
        }
    }
}

/// Text and color of a single day, as shown in the day editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub text: String,
    pub color: Option<Rgba>,
}

pub struct CalendarService<S: CalendarStore> {
    store: S,
}

impl<S: CalendarStore> CalendarService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reloads every schedule row. A failed fetch leaves an empty calendar.
    pub async fn refresh(&self, state: &mut AppState) {
        state.events = match self.store.list_events().await {
            Ok(events) => events,
            Err(err) => {
                error!("Failed to load schedule rows: {}", err);
                Vec::new()
            }
        };
    }

    pub async fn load_global_color(&self, state: &mut AppState) {
        state.global_color = match self.store.find_setting(&state.username).await {
            Ok(Some(setting)) => setting.color(),
            Ok(None) => {
                warn!("No settings row for {}", state.username);
                Rgba::DEFAULT_GLOBAL
            }
            Err(err) => {
                error!("Failed to load global color: {}", err);
                Rgba::DEFAULT_GLOBAL
            }
        };
    }

    pub fn grid(&self, state: &AppState, today: NaiveDate) -> MonthGrid {
        build_month_grid(state.cursor, &state.events, state.global_color, today)
    }

    pub fn navigate_next(&self, state: &mut AppState) {
        state.cursor = state.cursor.next();
    }

    pub fn navigate_previous(&self, state: &mut AppState) {
        state.cursor = state.cursor.previous();
    }

    pub fn day_detail(&self, state: &AppState, date: NaiveDate) -> DayDetail {
        let first = state.events.iter().find(|event| event.day() == Some(date));
        DayDetail {
            date,
            text: first.map(|event| event.text().to_string()).unwrap_or_default(),
            color: first.and_then(|event| {
                event
                    .btn_color
                    .as_deref()
                    .filter(|raw| !raw.trim().is_empty())
                    .map(|raw| Rgba::resolve_stored(Some(raw), state.global_color))
            }),
        }
    }

    /// Writes a day's text and color. `None` clears the day's own color.
    /// A day left with neither text nor color loses its row.
    pub async fn save_day(
        &self,
        state: &mut AppState,
        date: NaiveDate,
        text: &str,
        color: Option<Rgba>,
    ) -> bool {
        let event = ScheduleEvent::new(date, text.trim_end(), color);
        let saved = match self.store.upsert_event(&event).await {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to save schedule for {}: {}", event.schedule_day, err);
                false
            }
        };
        if saved && text.trim().is_empty() && color.is_none() {
            self.prune_empty_rows(date).await;
        }
        self.refresh(state).await;
        saved
    }

    /// Adds one more row for `date` next to any existing ones.
    pub async fn add_event(
        &self,
        state: &mut AppState,
        date: NaiveDate,
        text: &str,
        color: Option<Rgba>,
    ) -> bool {
        let event = ScheduleEvent::new(date, text.trim_end(), color);
        let added = match self.store.insert_event(&event).await {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to add schedule for {}: {}", event.schedule_day, err);
                false
            }
        };
        self.refresh(state).await;
        added
    }

    /// Sets a day's color while keeping its current text.
    pub async fn set_day_color(&self, state: &mut AppState, date: NaiveDate, color: Rgba) -> bool {
        let text = self.day_detail(state, date).text;
        self.save_day(state, date, &text, Some(color)).await
    }

    pub async fn clear_day_color(&self, state: &mut AppState, date: NaiveDate) -> bool {
        let cleared = match self.store.clear_color_for_date(date).await {
            Ok(cleared) => cleared,
            Err(err) => {
                error!("Failed to clear color for {}: {}", format_day(date), err);
                false
            }
        };
        if cleared {
            self.prune_empty_rows(date).await;
        }
        self.refresh(state).await;
        cleared
    }

    /// Drops the rows of `date` that have neither text nor color. Rows that
    /// still carry text are kept.
    async fn prune_empty_rows(&self, date: NaiveDate) {
        if let Err(err) = self.store.delete_empty_rows_for_date(date).await {
            error!("Failed to delete empty rows for {}: {}", format_day(date), err);
        }
    }

    /// Persists the global color; state only changes once the store accepts it.
    pub async fn set_global_color(&self, state: &mut AppState, color: Rgba) -> bool {
        match self.store.save_global_color(&state.username, color).await {
            Ok(true) => {
                info!("Global color for {} set to {}", state.username, color);
                state.global_color = color;
                true
            }
            Ok(false) => {
                warn!("Settings row for {} was not updated", state.username);
                false
            }
            Err(err) => {
                error!("Failed to save global color: {}", err);
                false
            }
        }
    }
}
