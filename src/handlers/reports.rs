use actix_web::{web, HttpResponse};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::errors::{render, AppError};
use crate::filters::{filter, filter_actions};
use crate::models::{ActionItem, AgendaItem, Meeting};
use crate::reports::{
    self, sort, BufferTarget, Delivery, ReportConfig, ReportKind, ReportMode, ReportRecord,
    SortSpec,
};
use crate::views::{read, AppState};

#[derive(Debug, Deserialize)]
pub struct CustomReportRequest {
    #[serde(flatten)]
    pub config: ReportConfig,
    #[serde(default)]
    pub delivery: Delivery,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub preview: bool,
}

#[derive(Serialize)]
struct FieldOption {
    key: &'static str,
    label: &'static str,
    default: bool,
}

#[derive(Serialize)]
struct SortOption {
    key: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct ReportOptions {
    kind: ReportKind,
    title: &'static str,
    fields: Vec<FieldOption>,
    sort_options: Vec<SortOption>,
    default_sort: SortSpec,
}

fn options_for<T: ReportRecord>() -> ReportOptions {
    let columns = T::columns();
    ReportOptions {
        kind: T::KIND,
        title: T::KIND.title(),
        fields: columns
            .iter()
            .map(|c| FieldOption { key: c.key, label: c.label, default: c.default })
            .collect(),
        sort_options: sort::options(&columns)
            .into_iter()
            .map(|(key, label)| SortOption { key, label })
            .collect(),
        default_sort: T::KIND.default_sort(),
    }
}

/// GET /reports/{kind}/options - Selectable fields and sort keys for the config dialog.
pub async fn options(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let kind = ReportKind::from_key(&path).ok_or(AppError::NotFound)?;
    let body = match kind {
        ReportKind::Meetings => options_for::<Meeting>(),
        ReportKind::AgendaItems => options_for::<AgendaItem>(),
        ReportKind::ActionItems => options_for::<ActionItem>(),
    };
    Ok(HttpResponse::Ok().json(body))
}

/// GET /reports/{kind}/quick - Everything the view currently shows, default columns.
pub async fn quick(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let kind = ReportKind::from_key(&path).ok_or(AppError::NotFound)?;
    produce(&state, kind, ReportMode::Quick, Delivery::Print)
}

/// POST /reports/{kind} - Custom report from a JSON `ReportConfig`.
pub async fn custom(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
    body: web::Json<CustomReportRequest>,
) -> Result<HttpResponse, AppError> {
    let kind = ReportKind::from_key(&path).ok_or(AppError::NotFound)?;
    let request = body.into_inner();
    let delivery = if query.preview { Delivery::Preview } else { request.delivery };
    produce(&state, kind, ReportMode::Custom(request.config), delivery)
}

/// Reports start from the records the view currently shows.
fn produce(
    state: &AppState,
    kind: ReportKind,
    mode: ReportMode,
    delivery: Delivery,
) -> Result<HttpResponse, AppError> {
    let spec = state.filters.snapshot();
    match kind {
        ReportKind::ActionItems => {
            let metric = *read(&state.metric);
            let records = read(&state.actions)
                .data()
                .map(|d| filter_actions(&d.items, &spec, metric))
                .unwrap_or_default();
            respond(&records, &mode, delivery)
        }
        ReportKind::AgendaItems => {
            let records = read(&state.agenda)
                .data()
                .map(|items| filter(items, &spec))
                .unwrap_or_default();
            respond(&records, &mode, delivery)
        }
        ReportKind::Meetings => {
            let records = read(&state.meetings)
                .data()
                .map(|d| filter(&d.meetings, &spec))
                .unwrap_or_default();
            respond(&records, &mode, delivery)
        }
    }
}

fn respond<T: ReportRecord>(
    records: &[T],
    mode: &ReportMode,
    delivery: Delivery,
) -> Result<HttpResponse, AppError> {
    if delivery == Delivery::Preview {
        let doc = reports::build(records, mode, delivery, Local::now().naive_local())?;
        return render(doc);
    }

    let mut target = BufferTarget::new();
    let out = reports::generate(records, mode, delivery, &mut target)?;
    if let Some(notice) = &out.notice {
        log::info!("{}: {}", notice.title, notice.description);
    }

    let mut resp = HttpResponse::Ok();
    resp.content_type("text/html; charset=utf-8")
        .insert_header(("X-Report-Records", out.record_count.to_string()));
    if delivery == Delivery::Download {
        resp.insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"relatorio-{}.html\"", T::KIND.key()),
        ));
    }
    Ok(resp.body(target.html))
}
