use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Completion log of one habit, keyed by `YYYY-MM-DD`. A missing entry means
/// the day was not completed.
pub type HabitLog = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub log: HabitLog,
}

impl Habit {
    pub fn is_done(&self, date_key: &str) -> bool {
        self.log.get(date_key).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppData {
    pub habits: Vec<Habit>,
}

#[derive(Debug, Deserialize)]
pub struct AddHabitRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub date: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthDirection {
    Prev,
    Next,
}

#[derive(Debug, Deserialize)]
pub struct MonthRequest {
    pub direction: MonthDirection,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub habits: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DarkModeResponse {
    pub dark_mode: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub habits: usize,
}
