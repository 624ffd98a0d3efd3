use actix_web::{web, HttpResponse};
use chrono::Local;

use crate::errors::AppError;
use crate::models::Status;
use crate::views::{derived, read, write, AppState};

/// GET /api/action-items - Filtered actions with KPIs and chart series.
pub async fn list(state: web::Data<AppState>) -> HttpResponse {
    let spec = state.filters.snapshot();
    let metric = *read(&state.metric);
    let today = Local::now().date_naive();
    let view = read(&state.actions);
    HttpResponse::Ok().json(view.envelope(|data| derived::actions(data, &spec, metric, today)))
}

/// POST /api/action-items/metric/{status} - Toggle the KPI drill-down.
pub async fn toggle_metric(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let key = path.into_inner();
    let status = Status::from_key(&key)
        .ok_or_else(|| AppError::BadRequest(format!("unknown status '{key}'")))?;
    let active = {
        let mut metric = write(&state.metric);
        metric.toggle(status);
        metric.get()
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({ "active_metric": active })))
}
