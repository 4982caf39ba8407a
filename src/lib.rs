pub mod app;
pub mod colors;
pub mod config;
pub mod errors;
pub mod habits;
pub mod handlers;
pub mod models;
pub mod render;
pub mod state;
pub mod storage;
pub mod ui;
pub mod views;

pub use app::router;
pub use config::Config;
pub use state::{AppState, ViewState};
pub use storage::Storage;

use views::{today, CalendarMonth};

/// Loads persisted state from `storage` and builds the shared handle with the
/// calendar on the current month.
pub async fn load_app_state(storage: Storage) -> AppState {
    let data = storage.load_state().await;
    let dark_mode = storage.load_dark_mode().await;
    let view = ViewState::new(CalendarMonth::containing(today()), dark_mode);
    AppState::new(storage, data, view)
}
