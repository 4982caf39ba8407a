use crate::errors::AppError;
use crate::habits::{parse_import, ImportError};
use crate::models::{
    AddHabitRequest, AppData, ConfirmRequest, DarkModeResponse, FilterRequest, ImportResponse,
    MonthDirection, MonthRequest, ToggleRequest,
};
use crate::render::{
    assign_colors, render_calendar, render_filter, render_page, render_week, CalendarView,
    FilterView, WeekGrid,
};
use crate::state::{AppState, Notice};
use crate::ui::{render_calendar_fragment, render_index};
use crate::views::{date_key, parse_date_key, today, week_keys_at};
use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use tracing::{info, warn};

const EXPORT_FILE_NAME: &str = "habits-export.json";

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub calendar: CalendarView,
    pub filter: FilterView,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = today();
    let week = week_keys_at(today);
    let data = state.data.lock().await;
    let mut view = state.view.lock().await;
    assign_colors(&mut view, &data);
    let page = render_page(&data, &view, &week, today);
    view.notice = None;
    Html(render_index(&page))
}

pub async fn calendar_fragment(State(state): State<AppState>) -> Html<String> {
    let panel = calendar_panel(&state).await;
    Html(render_calendar_fragment(&panel.calendar, &panel.filter))
}

pub async fn add_habit(
    State(state): State<AppState>,
    Form(payload): Form<AddHabitRequest>,
) -> Redirect {
    apply_add(&state, &payload.name).await;
    Redirect::to("/")
}

pub async fn toggle_day(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    Form(payload): Form<ToggleRequest>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, &habit_id, &payload.date).await?;
    Ok(Redirect::to("/"))
}

pub async fn tick_today(State(state): State<AppState>, Path(habit_id): Path<String>) -> Redirect {
    toggle_key(&state, &habit_id, &date_key(today())).await;
    Redirect::to("/")
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    Form(payload): Form<ConfirmRequest>,
) -> Result<Redirect, AppError> {
    apply_delete(&state, &habit_id, payload.confirm).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset(
    State(state): State<AppState>,
    Form(payload): Form<ConfirmRequest>,
) -> Result<Redirect, AppError> {
    apply_reset(&state, payload.confirm).await?;
    state.view.lock().await.notice = Some(Notice::ResetComplete);
    Ok(Redirect::to("/"))
}

pub async fn export(State(state): State<AppState>) -> Result<Response, AppError> {
    let body = state.data.lock().await.export_json()?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    )
        .into_response())
}

pub async fn import_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut contents = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let text = field
            .text()
            .await
            .map_err(|err| AppError::bad_request(err.to_string()))?;
        contents = Some(text);
    }

    let Some(text) = contents.filter(|text| !text.trim().is_empty()) else {
        return Ok(Redirect::to("/"));
    };

    let notice = match apply_import(&state, &text).await {
        Ok(_) => Notice::ImportComplete,
        Err(_) => Notice::ImportFailed,
    };
    state.view.lock().await.notice = Some(notice);
    Ok(Redirect::to("/"))
}

pub async fn calendar_prev(State(state): State<AppState>) -> Redirect {
    shift_month(&state, MonthDirection::Prev).await;
    Redirect::to("/#calendar")
}

pub async fn calendar_next(State(state): State<AppState>) -> Redirect {
    shift_month(&state, MonthDirection::Next).await;
    Redirect::to("/#calendar")
}

/// Checkbox form: every checked box arrives as a repeated `habit` field.
pub async fn calendar_filter(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    let selected = fields
        .into_iter()
        .filter(|(key, _)| key == "habit")
        .map(|(_, value)| value)
        .collect();
    set_filter(&state, selected).await;
    Redirect::to("/#calendar")
}

pub async fn dark_mode(State(state): State<AppState>) -> Redirect {
    flip_dark_mode(&state).await;
    Redirect::to("/")
}

pub async fn api_state(State(state): State<AppState>) -> Json<AppData> {
    Json(state.data.lock().await.clone())
}

pub async fn api_add_habit(
    State(state): State<AppState>,
    Json(payload): Json<AddHabitRequest>,
) -> Json<AppData> {
    apply_add(&state, &payload.name).await;
    api_state(State(state)).await
}

pub async fn api_toggle(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<AppData>, AppError> {
    apply_toggle(&state, &habit_id, &payload.date).await?;
    Ok(api_state(State(state)).await)
}

pub async fn api_delete(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    Json(payload): Json<ConfirmRequest>,
) -> Result<Json<AppData>, AppError> {
    apply_delete(&state, &habit_id, payload.confirm).await?;
    Ok(api_state(State(state)).await)
}

pub async fn api_reset(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmRequest>,
) -> Result<Json<AppData>, AppError> {
    apply_reset(&state, payload.confirm).await?;
    Ok(api_state(State(state)).await)
}

pub async fn api_import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let habits = apply_import(&state, &body).await?;
    Ok(Json(ImportResponse { habits }))
}

pub async fn api_week(State(state): State<AppState>) -> Json<WeekGrid> {
    let today = today();
    let data = state.data.lock().await;
    Json(render_week(&data, &week_keys_at(today), today))
}

pub async fn api_calendar(State(state): State<AppState>) -> Json<CalendarResponse> {
    Json(calendar_panel(&state).await)
}

pub async fn api_month(
    State(state): State<AppState>,
    Json(payload): Json<MonthRequest>,
) -> Json<CalendarResponse> {
    shift_month(&state, payload.direction).await;
    Json(calendar_panel(&state).await)
}

pub async fn api_filter(
    State(state): State<AppState>,
    Json(payload): Json<FilterRequest>,
) -> Json<CalendarResponse> {
    set_filter(&state, payload.habits).await;
    Json(calendar_panel(&state).await)
}

pub async fn api_dark_mode(State(state): State<AppState>) -> Json<DarkModeResponse> {
    let dark_mode = flip_dark_mode(&state).await;
    Json(DarkModeResponse { dark_mode })
}

/// Runs `apply` under the data lock and rewrites storage when it reports a
/// change.
async fn mutate<T>(state: &AppState, apply: impl FnOnce(&mut AppData) -> Option<T>) -> Option<T> {
    let mut data = state.data.lock().await;
    let outcome = apply(&mut data);
    if outcome.is_some() {
        state.storage.save_state(&data).await;
    }
    outcome
}

async fn apply_add(state: &AppState, name: &str) {
    if let Some(habit) = mutate(state, |data| data.add_habit(name).cloned()).await {
        info!(habit = %habit.id, name = %habit.name, "habit added");
    }
}

async fn apply_toggle(state: &AppState, habit_id: &str, date: &str) -> Result<(), AppError> {
    let Some(date) = parse_date_key(date.trim()) else {
        return Err(AppError::bad_request("date must be YYYY-MM-DD"));
    };
    toggle_key(state, habit_id, &date_key(date)).await;
    Ok(())
}

async fn toggle_key(state: &AppState, habit_id: &str, key: &str) {
    if let Some(done) = mutate(state, |data| data.toggle_log(habit_id, key)).await {
        info!(habit = %habit_id, date = %key, done, "log toggled");
    }
}

async fn apply_delete(state: &AppState, habit_id: &str, confirmed: bool) -> Result<(), AppError> {
    if !confirmed {
        return Err(AppError::confirmation_required());
    }
    if let Some(habit) = mutate(state, |data| data.delete_habit(habit_id)).await {
        info!(habit = %habit.id, name = %habit.name, "habit deleted");
    }
    Ok(())
}

async fn apply_reset(state: &AppState, confirmed: bool) -> Result<(), AppError> {
    if !confirmed {
        return Err(AppError::confirmation_required());
    }
    mutate(state, |data| {
        data.reset_all();
        Some(())
    })
    .await;
    info!("all habits reset");
    Ok(())
}

async fn apply_import(state: &AppState, text: &str) -> Result<usize, ImportError> {
    let imported = match parse_import(text) {
        Ok(imported) => imported,
        Err(err) => {
            warn!("import rejected: {err}");
            return Err(err);
        }
    };
    let count = imported.habits.len();
    mutate(state, |data| {
        *data = imported;
        Some(())
    })
    .await;
    info!(habits = count, "state imported");
    Ok(count)
}

async fn calendar_panel(state: &AppState) -> CalendarResponse {
    let data = state.data.lock().await;
    let mut view = state.view.lock().await;
    assign_colors(&mut view, &data);
    CalendarResponse {
        calendar: render_calendar(&data, &view, today()),
        filter: render_filter(&data, &view),
    }
}

async fn shift_month(state: &AppState, direction: MonthDirection) {
    let mut view = state.view.lock().await;
    view.month = match direction {
        MonthDirection::Prev => view.month.prev(),
        MonthDirection::Next => view.month.next(),
    };
}

async fn set_filter(state: &AppState, selected: Vec<String>) {
    let mut view = state.view.lock().await;
    view.filter = selected.into_iter().collect();
}

async fn flip_dark_mode(state: &AppState) -> bool {
    let mut view = state.view.lock().await;
    view.dark_mode = !view.dark_mode;
    state.storage.save_dark_mode(view.dark_mode).await;
    view.dark_mode
}
