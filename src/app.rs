use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits", post(handlers::add_habit))
        .route("/habits/:id/toggle", post(handlers::toggle_day))
        .route("/habits/:id/tick", post(handlers::tick_today))
        .route("/habits/:id/delete", post(handlers::delete_habit))
        .route("/reset", post(handlers::reset))
        .route("/export", get(handlers::export))
        .route("/import", post(handlers::import_upload))
        .route("/calendar/prev", post(handlers::calendar_prev))
        .route("/calendar/next", post(handlers::calendar_next))
        .route("/calendar/filter", post(handlers::calendar_filter))
        .route("/fragments/calendar", get(handlers::calendar_fragment))
        .route("/dark-mode", post(handlers::dark_mode))
        .route("/api/state", get(handlers::api_state))
        .route("/api/habits", post(handlers::api_add_habit))
        .route("/api/habits/:id/toggle", post(handlers::api_toggle))
        .route("/api/habits/:id/delete", post(handlers::api_delete))
        .route("/api/reset", post(handlers::api_reset))
        .route("/api/export", get(handlers::export))
        .route("/api/import", post(handlers::api_import))
        .route("/api/week", get(handlers::api_week))
        .route("/api/calendar", get(handlers::api_calendar))
        .route("/api/calendar/month", post(handlers::api_month))
        .route("/api/calendar/filter", post(handlers::api_filter))
        .route("/api/dark-mode", post(handlers::api_dark_mode))
        .with_state(state)
}
