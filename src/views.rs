use crate::models::{AppData, Habit};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const WEEK_LEN: usize = 7;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// The seven date keys ending at `today`, oldest first.
pub fn week_keys_at(today: NaiveDate) -> Vec<String> {
    (0..WEEK_LEN as i64)
        .rev()
        .map(|offset| date_key(today - Duration::days(offset)))
        .collect()
}

pub fn compute_streak(habit: &Habit) -> u32 {
    compute_streak_at(today(), habit)
}

/// Counts completed days walking backward from `today`. An unmarked today
/// ends the streak immediately.
pub fn compute_streak_at(today: NaiveDate, habit: &Habit) -> u32 {
    let mut count = 0;
    let mut day = today;
    while habit.is_done(&date_key(day)) {
        count += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub habit: String,
    pub date: String,
}

/// Every `true` log entry as a (habit name, date key) pair, in habit order.
pub fn completions(data: &AppData) -> Vec<Completion> {
    data.habits
        .iter()
        .flat_map(|habit| {
            habit
                .log
                .iter()
                .filter(|(_, done)| **done)
                .map(move |(date, _)| Completion {
                    habit: habit.name.clone(),
                    date: date.clone(),
                })
        })
        .collect()
}

/// Distinct habit names with at least one completion, first-seen order.
///
/// Habits that were never completed do not appear here even though the week
/// grid lists them.
pub fn known_habits(completions: &[Completion]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    completions
        .iter()
        .filter(|entry| seen.insert(entry.habit.as_str()))
        .map(|entry| entry.habit.clone())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or_default()
    }

    pub fn days_in_month(self) -> u32 {
        self.last_day().day()
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Human label such as `October 2026`.
    pub fn label(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    pub fn date_key(self, day: u32) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, day)
    }
}

/// Day of month → habit names completed that day, restricted to `filter`.
/// An empty filter shows every habit.
pub fn calendar_day_map(
    data: &AppData,
    month: CalendarMonth,
    filter: &BTreeSet<String>,
) -> BTreeMap<u32, Vec<String>> {
    let mut map: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for entry in completions(data) {
        if !filter.is_empty() && !filter.contains(&entry.habit) {
            continue;
        }
        let Some(date) = parse_date_key(&entry.date) else {
            continue;
        };
        if CalendarMonth::containing(date) != month {
            continue;
        }
        map.entry(date.day()).or_default().push(entry.habit);
    }
    map
}
