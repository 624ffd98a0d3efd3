use actix_web::{web, HttpResponse};

use crate::views::{derived, read, AppState};

/// GET /api/agenda-items - Cross-meeting agenda rollup, filtered.
pub async fn list(state: web::Data<AppState>) -> HttpResponse {
    let spec = state.filters.snapshot();
    let view = read(&state.agenda);
    HttpResponse::Ok().json(view.envelope(|items| derived::agenda(items, &spec)))
}
