use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::errors::AppError;
use crate::filters::{FilterPatch, FilterSpec};
use crate::models::Status;
use crate::views::{write, AppState};

#[derive(Serialize)]
struct FilterResponse {
    #[serde(flatten)]
    spec: FilterSpec,
    active_filters: usize,
    revision: u64,
}

fn current(state: &AppState) -> HttpResponse {
    let spec = state.filters.snapshot();
    HttpResponse::Ok().json(FilterResponse {
        active_filters: spec.active_filters_count(),
        revision: state.filters.revision(),
        spec,
    })
}

/// GET /api/filters
pub async fn show(state: web::Data<AppState>) -> HttpResponse {
    current(&state)
}

/// PUT /api/filters - Replace the whole spec.
pub async fn replace(state: web::Data<AppState>, body: web::Json<FilterSpec>) -> HttpResponse {
    state.filters.replace(body.into_inner());
    current(&state)
}

/// PATCH /api/filters - Update only the given fields.
pub async fn patch(
    state: web::Data<AppState>,
    body: web::Json<FilterPatch>,
) -> Result<HttpResponse, AppError> {
    let mut spec = state.filters.snapshot();
    body.into_inner().apply(&mut spec).map_err(AppError::BadRequest)?;
    state.filters.replace(spec);
    Ok(current(&state))
}

/// DELETE /api/filters - Clear every filter and the KPI drill-down.
pub async fn clear(state: web::Data<AppState>) -> HttpResponse {
    state.filters.clear();
    write(&state.metric).clear();
    current(&state)
}

/// POST /api/filters/territories/{name}/toggle
pub async fn toggle_territory(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    state.filters.toggle_territory(&path);
    current(&state)
}

/// POST /api/filters/statuses/{status}/toggle
pub async fn toggle_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let status = Status::from_key(&path)
        .ok_or_else(|| AppError::BadRequest(format!("unknown status '{}'", path.as_str())))?;
    state.filters.toggle_status(status);
    Ok(current(&state))
}
