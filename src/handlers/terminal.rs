use unicode_width::UnicodeWidthChar;

use crate::service::calendar_service::DayDetail;
use crate::service::grid::{CellDescriptor, MonthGrid, SourceMonth};

pub type WeekdayLabels = [String; 7];

pub const DEFAULT_WEEKDAY_LABELS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

const CELL_WIDTH: usize = 12;

pub fn month_header(grid: &MonthGrid) -> String {
    format!("{}년 {}월", grid.year, grid.month)
}

/// Plain-text month view: header, weekday labels, then one line per week.
pub fn render_month(grid: &MonthGrid, labels: &WeekdayLabels) -> String {
    let mut out = String::new();
    out.push_str(&month_header(grid));
    out.push('\n');
    let header: Vec<String> = labels.iter().map(|label| pad(label)).collect();
    out.push_str(header.join("|").trim_end());
    out.push('\n');
    for row in grid.rows() {
        let cells: Vec<String> = row.iter().map(|cell| pad(&cell_label(cell))).collect();
        out.push_str(cells.join("|").trim_end());
        out.push('\n');
    }
    out
}

/// Day number plus the first line of the day's events. Adjacent-month days are
/// bracketed and today carries a `*`.
pub fn cell_label(cell: &CellDescriptor) -> String {
    let summary = cell
        .display_text
        .split("\n\n")
        .nth(1)
        .and_then(|text| text.lines().next())
        .unwrap_or("");
    let day = match cell.source_month {
        SourceMonth::Current if cell.is_today => format!("*{}", cell.day_number),
        SourceMonth::Current => cell.day_number.to_string(),
        SourceMonth::Previous | SourceMonth::Next => format!("({})", cell.day_number),
    };
    if summary.is_empty() {
        day
    } else {
        format!("{day} {summary}")
    }
}

pub fn render_day(detail: &DayDetail) -> String {
    let mut out = format!("{}\n", detail.date.format("%Y-%m-%d"));
    if let Some(color) = detail.color {
        out.push_str(&format!("color: {color}\n"));
    }
    if detail.text.is_empty() {
        out.push_str("(no schedule)\n");
    } else {
        out.push_str(&detail.text);
        out.push('\n');
    }
    out
}

/// Fits `text` into exactly `CELL_WIDTH` terminal columns. Hangul and other
/// wide characters take two columns.
fn pad(text: &str) -> String {
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > CELL_WIDTH {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push_str(&" ".repeat(CELL_WIDTH - width));
    out
}
