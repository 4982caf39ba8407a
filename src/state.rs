use crate::colors::ColorMap;
use crate::models::AppData;
use crate::storage::Storage;
use crate::views::CalendarMonth;
use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::Mutex;

/// One-shot message shown as a blocking alert on the next page render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ImportComplete,
    ImportFailed,
    ResetComplete,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::ImportComplete => "Import complete. Data loaded.",
            Notice::ImportFailed => "Import failed. Please check the JSON file format.",
            Notice::ResetComplete => "All data reset.",
        }
    }
}

/// Presentation state that lives beside the habits but is not part of the
/// exported document.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub month: CalendarMonth,
    pub filter: BTreeSet<String>,
    pub colors: ColorMap,
    pub dark_mode: bool,
    pub notice: Option<Notice>,
}

impl ViewState {
    pub fn new(month: CalendarMonth, dark_mode: bool) -> Self {
        Self {
            month,
            filter: BTreeSet::new(),
            colors: ColorMap::default(),
            dark_mode,
            notice: None,
        }
    }
}

/// Shared handle passed to every handler. Lock `data` before `view` when both
/// are needed.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub data: Arc<Mutex<AppData>>,
    pub view: Arc<Mutex<ViewState>>,
}

impl AppState {
    pub fn new(storage: Storage, data: AppData, view: ViewState) -> Self {
        Self {
            storage,
            data: Arc::new(Mutex::new(data)),
            view: Arc::new(Mutex::new(view)),
        }
    }
}
