use crate::models::AppData;
use std::{io, path::PathBuf};
use tokio::fs;
use tracing::{debug, error};

pub const STATE_KEY: &str = "habitTrackerState";
pub const DARK_MODE_KEY: &str = "darkMode";

/// String values stored one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub async fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(key), value).await
    }

    pub async fn load_state(&self) -> AppData {
        match self.get(STATE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(err) => {
                    error!("failed to parse stored state: {err}");
                    AppData::default()
                }
            },
            Ok(None) => AppData::default(),
            Err(err) => {
                error!("failed to read stored state: {err}");
                AppData::default()
            }
        }
    }

    /// Rewrites the whole state record. Failures are logged, not returned:
    /// the in-memory state stays authoritative for the running process.
    pub async fn save_state(&self, data: &AppData) {
        let payload = match serde_json::to_string(data) {
            Ok(payload) => payload,
            Err(err) => {
                error!("failed to serialize state: {err}");
                return;
            }
        };
        match self.set(STATE_KEY, &payload).await {
            Ok(()) => debug!(habits = data.habits.len(), "state saved"),
            Err(err) => error!("failed to write state: {err}"),
        }
    }

    pub async fn load_dark_mode(&self) -> bool {
        match self.get(DARK_MODE_KEY).await {
            Ok(value) => value.is_some_and(|raw| raw.trim() == "true"),
            Err(err) => {
                error!("failed to read dark mode flag: {err}");
                false
            }
        }
    }

    pub async fn save_dark_mode(&self, enabled: bool) {
        if let Err(err) = self.set(DARK_MODE_KEY, if enabled { "true" } else { "false" }).await {
            error!("failed to write dark mode flag: {err}");
        }
    }
}
