mod common;

use calendarGrid::models::color::Rgba;
use calendarGrid::models::schedule::ScheduleEvent;
use calendarGrid::service::grid::{
    SourceMonth, YearMonth, build_month_grid, filter_events_for_month,
};
use common::date;

fn event(day: &str, value: &str) -> ScheduleEvent {
    ScheduleEvent {
        schedule_day: day.to_string(),
        schedule_value: Some(value.to_string()),
        btn_color: None,
    }
}

#[test]
fn same_day_texts_join_with_blank_lines_on_white() {
    let events = vec![event("2024-03-05", "A"), event("2024-03-05", "B")];
    let month = YearMonth::new(2024, 3).unwrap();
    let grid = build_month_grid(month, &events, Rgba::WHITE, date(2024, 3, 1));

    let cell = grid.cell_for(date(2024, 3, 5)).unwrap();
    assert_eq!(cell.display_text, "5\n\nA\n\nB");
    assert_eq!(cell.background, Rgba::WHITE);
    assert_eq!(cell.text_color, Rgba::BLACK);
    assert_eq!(cell.source_month, SourceMonth::Current);
}

#[test]
fn leap_february_ends_on_the_29th() {
    let month = YearMonth::new(2024, 2).unwrap();
    assert_eq!(month.last_day(), date(2024, 2, 29));

    let events = vec![
        event("2024-02-29", "leap day"),
        event("2024-03-01", "march"),
        event("2024-01-31", "january"),
    ];
    let kept = filter_events_for_month(&events, month);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].text(), "leap day");
}

#[test]
fn adjacent_months_roll_over_the_year() {
    let january = YearMonth::new(2024, 1).unwrap();
    let previous = january.previous();
    assert_eq!((previous.year(), previous.month()), (2023, 12));

    let december = YearMonth::new(2024, 12).unwrap();
    let next = december.next();
    assert_eq!((next.year(), next.month()), (2025, 1));

    // December's trailing cells come from the following January
    let events = vec![event("2025-01-02", "back to work")];
    let grid = build_month_grid(december, &events, Rgba::WHITE, date(2024, 12, 1));
    let cell = grid.cell_for(date(2025, 1, 2)).unwrap();
    assert_eq!(cell.source_month, SourceMonth::Next);
    assert_eq!(cell.display_text, "2\n\nback to work");
}

#[test]
fn every_month_of_a_decade_fits_in_whole_weeks() {
    for year in 2020..2030 {
        for month in 1..=12 {
            let ym = YearMonth::new(year, month).unwrap();
            let grid = build_month_grid(ym, &[], Rgba::DEFAULT_GLOBAL, date(2020, 1, 1));
            assert_eq!(grid.cells.len() % 7, 0, "{year}-{month}");
            assert!(grid.cells.len() >= 35);
            let current = grid
                .cells
                .iter()
                .filter(|cell| cell.source_month == SourceMonth::Current)
                .count() as u32;
            assert_eq!(current, ym.days_in_month(), "{year}-{month}");
        }
    }
}

#[test]
fn saturday_start_with_31_days_keeps_the_30th_and_31st() {
    // 2022-10-01 is a Saturday
    let month = YearMonth::new(2022, 10).unwrap();
    let grid = build_month_grid(month, &[], Rgba::DEFAULT_GLOBAL, date(2022, 10, 31));
    assert_eq!(grid.cells.len(), 42);
    assert_eq!(grid.cell_for(date(2022, 10, 30)).unwrap().source_month, SourceMonth::Current);
    let last = grid.cell_for(date(2022, 10, 31)).unwrap();
    assert!(last.is_today);
    assert_eq!(last.outline_color(), Some(Rgba::DEFAULT_GLOBAL.complement()));
}

#[test]
fn text_contrast_flips_on_strict_luma_threshold() {
    assert_eq!(Rgba::new(1.0, 1.0, 1.0, 1.0).text_color(), Rgba::BLACK);
    assert_eq!(Rgba::new(0.0, 0.0, 0.0, 1.0).text_color(), Rgba::WHITE);
    assert_eq!(Rgba::new(0.5, 0.5, 0.5, 1.0).text_color(), Rgba::WHITE);
}

#[test]
fn blank_and_missing_colors_use_global_not_white() {
    let global = Rgba::new(0.3, 0.6, 0.9, 1.0);
    let events = vec![
        ScheduleEvent {
            schedule_day: "2024-05-01".to_string(),
            schedule_value: Some("blank".to_string()),
            btn_color: Some(String::new()),
        },
        event("2024-05-02", "missing"),
    ];
    let grid = build_month_grid(YearMonth::new(2024, 5).unwrap(), &events, global, date(2024, 5, 1));
    assert_eq!(grid.cell_for(date(2024, 5, 1)).unwrap().background, global);
    assert_eq!(grid.cell_for(date(2024, 5, 2)).unwrap().background, global);
}

#[test]
fn adjacent_tint_is_seventy_percent_with_alpha_kept() {
    let global = Rgba::new(0.8, 0.4, 1.0, 0.5);
    let grid = build_month_grid(YearMonth::new(2024, 5).unwrap(), &[], global, date(2024, 5, 1));
    for cell in grid.cells.iter().filter(|c| c.source_month != SourceMonth::Current) {
        assert_eq!(cell.background.r, global.r * 0.7);
        assert_eq!(cell.background.g, global.g * 0.7);
        assert_eq!(cell.background.b, global.b * 0.7);
        assert_eq!(cell.background.a, 0.5);
    }
}
