use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::views::{AppState, ViewKind};

/// POST /api/refetch/{view} - Reload one view from the backing store.
///
/// `started` is false when a fetch for that view was already running.
pub async fn refetch(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let kind = ViewKind::from_key(&path).ok_or(AppError::NotFound)?;
    let started = state.refetch(kind).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "view": kind.key(),
        "started": started,
    })))
}
