mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use tracing::info;

use application::page_service::PageService;
use data::comment_repository::PostgresCommentRepository;
use data::post_repository::PostgresPostRepository;
use data::tag_repository::PostgresTagRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use presentation::handlers;
use presentation::middleware::RequestTrace;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let post_repo = Arc::new(PostgresPostRepository::new(pool.clone()));
    let tag_repo = Arc::new(PostgresTagRepository::new(pool.clone()));
    let comment_repo = Arc::new(PostgresCommentRepository::new(pool.clone()));

    let page_service = PageService::new(post_repo, tag_repo, comment_repo);

    info!(host = %config.host, port = config.port, "starting blog server");

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .app_data(web::Data::new(page_service.clone()))
            .service(handlers::health::health)
            .service(handlers::pages::index)
            .service(handlers::pages::post_detail)
            .service(handlers::pages::tag_filter)
            .service(handlers::pages::contacts)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
