use crate::models::{AppData, Habit};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import file is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("import file has no `habits` array")]
    MissingHabits,
    #[error("import file has a malformed habit: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("import file repeats habit id `{0}`")]
    DuplicateId(String),
}

impl AppData {
    /// Appends a habit named `name` (trimmed). Blank names are ignored.
    pub fn add_habit(&mut self, name: &str) -> Option<&Habit> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        self.habits.push(Habit {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            log: Default::default(),
        });
        self.habits.last()
    }

    /// Flips the completion entry for `date_key` and returns the new value,
    /// or `None` when no habit has `habit_id`.
    pub fn toggle_log(&mut self, habit_id: &str, date_key: &str) -> Option<bool> {
        let habit = self.habits.iter_mut().find(|habit| habit.id == habit_id)?;
        let entry = habit.log.entry(date_key.to_string()).or_insert(false);
        *entry = !*entry;
        Some(*entry)
    }

    pub fn delete_habit(&mut self, habit_id: &str) -> Option<Habit> {
        let index = self.habits.iter().position(|habit| habit.id == habit_id)?;
        Some(self.habits.remove(index))
    }

    pub fn reset_all(&mut self) {
        self.habits.clear();
    }

    /// Serializes the state as it would be downloaded: 2-space indented JSON.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parses an exported document into a replacement state.
///
/// The document must be an object whose `habits` field is an array. Each
/// entry must also have the habit shape and ids must not repeat; nothing is
/// replaced unless the whole document is accepted.
pub fn parse_import(text: &str) -> Result<AppData, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Syntax)?;
    if !value.get("habits").is_some_and(Value::is_array) {
        return Err(ImportError::MissingHabits);
    }

    let data: AppData = serde_json::from_value(value).map_err(ImportError::Malformed)?;

    let mut seen = HashSet::new();
    for habit in &data.habits {
        if !seen.insert(habit.id.as_str()) {
            return Err(ImportError::DuplicateId(habit.id.clone()));
        }
    }

    Ok(data)
}
