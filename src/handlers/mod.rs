pub mod actions;
pub mod agenda;
pub mod filters;
pub mod meetings;
pub mod refetch;
pub mod reports;

use actix_web::{
    web, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::{from_fn, Next},
};

/// Rejects body-carrying requests (POST/PUT/PATCH) that are not JSON.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == Method::POST || method == Method::PUT || method == Method::PATCH {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Register the JSON API and report routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/territories", web::get().to(meetings::territories))
            .route("/action-items", web::get().to(actions::list))
            .route("/action-items/metric/{status}", web::post().to(actions::toggle_metric))
            .route("/agenda-items", web::get().to(agenda::list))
            .route("/meetings", web::get().to(meetings::list))
            .route("/refetch/{view}", web::post().to(refetch::refetch))
            .service(
                web::scope("/filters")
                    .service(
                        web::resource("")
                            .wrap(from_fn(require_json_content_type))
                            .route(web::get().to(filters::show))
                            .route(web::put().to(filters::replace))
                            .route(web::patch().to(filters::patch))
                            .route(web::delete().to(filters::clear)),
                    )
                    .route("/territories/{name}/toggle", web::post().to(filters::toggle_territory))
                    .route("/statuses/{status}/toggle", web::post().to(filters::toggle_status)),
            ),
    );
    cfg.service(
        web::scope("/reports")
            .route("/{kind}/options", web::get().to(reports::options))
            .route("/{kind}/quick", web::get().to(reports::quick))
            .service(
                web::resource("/{kind}")
                    .wrap(from_fn(require_json_content_type))
                    .route(web::post().to(reports::custom)),
            ),
    );
}
