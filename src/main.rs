use actix_web::{App, HttpServer, middleware, web};

use painel::config::AppConfig;
use painel::views::AppState;
use painel::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    let pool = db::init_pool(&config).expect("Invalid DATABASE_URL");
    if config.apply_schema {
        if let Err(e) = db::run_migrations(&pool).await {
            log::error!("Failed to apply schema: {e}");
        }
    }

    let state = web::Data::new(AppState::new(pool));
    state.refetch_all().await;

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
