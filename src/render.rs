//! Pure UI descriptions built from the habit state and view state.
//!
//! Every mutation rebuilds these from scratch; `ui` turns them into HTML and
//! the JSON API serves them as-is.

use crate::models::{AppData, Habit};
use crate::state::ViewState;
use crate::views::{
    calendar_day_map, completions, compute_streak_at, date_key, known_habits, CalendarMonth,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub today: String,
    pub week: WeekGrid,
    pub calendar: CalendarView,
    pub filter: FilterView,
    pub dark_mode: bool,
    pub notice: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekGrid {
    pub days: Vec<String>,
    pub rows: Vec<WeekRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeekRow {
    Habit(HabitRow),
    Placeholder {
        label: &'static str,
        streak: u32,
        hint: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitRow {
    pub id: String,
    pub name: String,
    pub cells: Vec<DayCell>,
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell {
    pub date: String,
    pub checked: bool,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub month: CalendarMonth,
    pub title: String,
    pub weekdays: [&'static str; 7],
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell {
    pub day: u32,
    pub in_month: bool,
    pub is_today: bool,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub habit: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterView {
    pub entries: Vec<FilterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterEntry {
    pub name: String,
    pub color: &'static str,
    pub selected: bool,
}

/// Gives every habit that shows up in the filter a color before rendering.
pub fn assign_colors(view: &mut ViewState, data: &AppData) {
    let names = known_habits(&completions(data));
    view.colors.assign(&names);
}

pub fn render_page(data: &AppData, view: &ViewState, week: &[String], today: NaiveDate) -> Page {
    Page {
        today: date_key(today),
        week: render_week(data, week, today),
        calendar: render_calendar(data, view, today),
        filter: render_filter(data, view),
        dark_mode: view.dark_mode,
        notice: view.notice.map(|notice| notice.message()),
    }
}

pub fn render_week(data: &AppData, week: &[String], today: NaiveDate) -> WeekGrid {
    let rows = if data.habits.is_empty() {
        vec![WeekRow::Placeholder {
            label: "No habits yet",
            streak: 0,
            hint: "Add a habit",
        }]
    } else {
        data.habits
            .iter()
            .map(|habit| WeekRow::Habit(habit_row(habit, week, today)))
            .collect()
    };

    WeekGrid {
        days: week.to_vec(),
        rows,
    }
}

fn habit_row(habit: &Habit, week: &[String], today: NaiveDate) -> HabitRow {
    let cells = week
        .iter()
        .map(|key| DayCell {
            date: key.clone(),
            checked: habit.is_done(key),
            label: format!("{} on {}", habit.name, key),
        })
        .collect();

    HabitRow {
        id: habit.id.clone(),
        name: habit.name.clone(),
        cells,
        streak: compute_streak_at(today, habit),
    }
}

/// Sunday-first month grid. Cells borrowed from the neighbouring months pad
/// the first and last rows and never carry markers.
pub fn render_calendar(data: &AppData, view: &ViewState, today: NaiveDate) -> CalendarView {
    let month = view.month;
    let first = month.first_day();
    let last = month.last_day();
    let day_map = calendar_day_map(data, month, &view.filter);

    let leading = first.weekday().num_days_from_sunday();
    let trailing = 6 - last.weekday().num_days_from_sunday();
    let prev_last = month.prev().days_in_month();

    let mut cells = Vec::with_capacity((leading + last.day() + trailing) as usize);
    for offset in (0..leading).rev() {
        cells.push(padding_cell(prev_last - offset));
    }
    for day in 1..=last.day() {
        let markers = day_map
            .get(&day)
            .map(|habits| {
                habits
                    .iter()
                    .map(|habit| Marker {
                        habit: habit.clone(),
                        color: view.colors.color_of(habit),
                    })
                    .collect()
            })
            .unwrap_or_default();
        cells.push(CalendarCell {
            day,
            in_month: true,
            is_today: CalendarMonth::containing(today) == month && today.day() == day,
            markers,
        });
    }
    for day in 1..=trailing {
        cells.push(padding_cell(day));
    }

    CalendarView {
        month,
        title: month.label(),
        weekdays: WEEKDAY_LABELS,
        cells,
    }
}

fn padding_cell(day: u32) -> CalendarCell {
    CalendarCell {
        day,
        in_month: false,
        is_today: false,
        markers: Vec::new(),
    }
}

/// Filter choices come from completion history, so a habit appears here only
/// once it has been completed at least once.
pub fn render_filter(data: &AppData, view: &ViewState) -> FilterView {
    let entries = known_habits(&completions(data))
        .into_iter()
        .map(|name| FilterEntry {
            color: view.colors.color_of(&name),
            selected: view.filter.contains(&name),
            name,
        })
        .collect();

    FilterView { entries }
}
