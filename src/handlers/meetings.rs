use actix_web::{web, HttpResponse};

use crate::views::{derived, read, AppState};

/// GET /api/meetings
pub async fn list(state: web::Data<AppState>) -> HttpResponse {
    let spec = state.filters.snapshot();
    let view = read(&state.meetings);
    HttpResponse::Ok().json(view.envelope(|data| derived::meetings(data, &spec)))
}

/// GET /api/territories - Reference territory list.
pub async fn territories(state: web::Data<AppState>) -> HttpResponse {
    let view = read(&state.meetings);
    HttpResponse::Ok().json(view.envelope(|data| data.territories.clone()))
}
