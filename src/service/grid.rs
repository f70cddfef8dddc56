//! Projects dated schedule rows onto a Sunday-first month grid.
//!
//! The grid always starts on the Sunday on or before the 1st and covers whole
//! weeks: 35 cells, or 42 when the month needs a sixth row.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::color::{ADJACENT_MONTH_TINT, Rgba};
use crate::models::schedule::ScheduleEvent;

pub const DAYS_PER_WEEK: usize = 7;
pub const MIN_GRID_CELLS: usize = 35;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),
    #[error("year {0} is outside 1..=9999")]
    InvalidYear(i32),
    #[error("no day number in cell text {0:?}")]
    InvalidDayText(String),
}

/// A calendar month, held as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, GridError> {
        if !(1..=12).contains(&month) {
            return Err(GridError::InvalidMonth(month));
        }
        if !(1..=9999).contains(&year) {
            return Err(GridError::InvalidYear(year));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(GridError::InvalidMonth(month))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date - Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Jump 32 days past the 1st, then step back to the end of the month before.
    pub fn last_day(&self) -> NaiveDate {
        let spill = self.first + Duration::days(32);
        spill - Duration::days(i64::from(spill.day()))
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last_day()
    }

    pub fn previous(&self) -> Self {
        Self::from_date(self.first - Duration::days(1))
    }

    pub fn next(&self) -> Self {
        Self {
            first: self.last_day() + Duration::days(1),
        }
    }

    /// Day of `self` with the given number; `None` past the month's end.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    /// Leading cells needed before the 1st in a Sunday-first week.
    pub fn first_weekday_offset(&self) -> usize {
        self.first.weekday().num_days_from_sunday() as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMonth {
    Previous,
    Current,
    Next,
}

/// Fully resolved render data for one grid square.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellDescriptor {
    pub date: NaiveDate,
    pub day_number: u32,
    pub source_month: SourceMonth,
    pub display_text: String,
    pub background: Rgba,
    pub text_color: Rgba,
    pub is_today: bool,
}

impl CellDescriptor {
    fn new(
        date: NaiveDate,
        source_month: SourceMonth,
        display_text: String,
        background: Rgba,
        is_today: bool,
    ) -> Self {
        Self {
            date,
            day_number: date.day(),
            source_month,
            display_text,
            background,
            text_color: background.text_color(),
            is_today,
        }
    }

    /// Outline for the today marker, the channel-wise complement of the background.
    pub fn outline_color(&self) -> Option<Rgba> {
        self.is_today.then(|| self.background.complement())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CellDescriptor>,
}

impl MonthGrid {
    pub fn rows(&self) -> impl Iterator<Item = &[CellDescriptor]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn cell_for(&self, date: NaiveDate) -> Option<&CellDescriptor> {
        self.cells.iter().find(|cell| cell.date == date)
    }
}

/// Rows whose date-only prefix falls inside `month`, in input order.
pub fn filter_events_for_month(events: &[ScheduleEvent], month: YearMonth) -> Vec<&ScheduleEvent> {
    events
        .iter()
        .filter(|event| match event.day() {
            Some(day) => month.contains(day),
            None => {
                debug!("Skipping schedule row with unreadable day {:?}", event.schedule_day);
                false
            }
        })
        .collect()
}

/// Number of cells needed to show all of `month` in whole weeks, never below 35.
pub fn grid_len(month: YearMonth) -> usize {
    let used = month.first_weekday_offset() + month.days_in_month() as usize;
    let weeks = used.div_ceil(DAYS_PER_WEEK);
    (weeks * DAYS_PER_WEEK).max(MIN_GRID_CELLS)
}

pub fn build_month_grid(
    month: YearMonth,
    events: &[ScheduleEvent],
    global_color: Rgba,
    today: NaiveDate,
) -> MonthGrid {
    let previous = month.previous();
    let next = month.next();
    let previous_days = group_by_day(filter_events_for_month(events, previous));
    let current_days = group_by_day(filter_events_for_month(events, month));
    let next_days = group_by_day(filter_events_for_month(events, next));

    let total = grid_len(month);
    let adjacent_color = global_color.tinted(ADJACENT_MONTH_TINT);
    let mut cells = Vec::with_capacity(total);

    let offset = month.first_weekday_offset();
    let mut date = month.first_day() - Duration::days(offset as i64);
    for _ in 0..offset {
        let text = compose_text(date, previous_days.get(&date));
        cells.push(CellDescriptor::new(
            date,
            SourceMonth::Previous,
            text,
            adjacent_color,
            false,
        ));
        date += Duration::days(1);
    }

    for _ in 0..month.days_in_month() {
        let day_events = current_days.get(&date);
        let background = match day_events.and_then(|events| events.first()) {
            Some(first) => first.color_or(global_color),
            None => global_color,
        };
        let text = compose_text(date, day_events);
        cells.push(CellDescriptor::new(
            date,
            SourceMonth::Current,
            text,
            background,
            date == today,
        ));
        date += Duration::days(1);
    }

    while cells.len() < total {
        let text = compose_text(date, next_days.get(&date));
        cells.push(CellDescriptor::new(
            date,
            SourceMonth::Next,
            text,
            adjacent_color,
            false,
        ));
        date += Duration::days(1);
    }

    MonthGrid {
        year: month.year(),
        month: month.month(),
        cells,
    }
}

/// Day number on the first line, then each non-empty event text separated by a blank line.
fn compose_text(date: NaiveDate, events: Option<&Vec<&ScheduleEvent>>) -> String {
    let mut text = date.day().to_string();
    for event in events.into_iter().flatten() {
        let value = event.text();
        if value.is_empty() {
            continue;
        }
        text.push_str("\n\n");
        text.push_str(value);
    }
    text
}

fn group_by_day(events: Vec<&ScheduleEvent>) -> BTreeMap<NaiveDate, Vec<&ScheduleEvent>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&ScheduleEvent>> = BTreeMap::new();
    for event in events {
        if let Some(day) = event.day() {
            by_day.entry(day).or_default().push(event);
        }
    }
    by_day
}

/// Recovers the day number from a cell's display text.
///
/// Prefer [`CellDescriptor::date`]; this only exists for callers that kept
/// nothing but the rendered text.
pub fn resolve_day_from_display_text(text: &str) -> Result<u32, GridError> {
    let first_line = text.lines().next().unwrap_or("");
    let prefix: String = first_line.chars().take(2).collect();
    prefix
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|day| (1..=31).contains(day))
        .ok_or_else(|| GridError::InvalidDayText(text.to_string()))
}
