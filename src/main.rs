//! Locavia Rental Engine Server
//!
//! Multi-tenant backend for equipment rental businesses: rental lifecycle,
//! billing settlement and fleet analytics behind a JSON API.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use locavia_api::handlers::{
    configure_dashboard, configure_insights, configure_rentals, configure_tools,
};
use locavia_core::AppConfig;
use locavia_db::{create_pool, run_migrations, PgSettingsRepository};
use locavia_services::{PgAnalyticsEngine, PgRentalManager};
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "locavia-rental",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Rental lifecycle endpoints
            .configure(configure_rentals)
            // Tool availability feed
            .configure(configure_tools)
            // Dashboard stats
            .configure(configure_dashboard)
            // Plan-gated insight endpoints
            .configure(configure_insights),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "locavia_rental={},locavia_api={},locavia_services={},locavia_db={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!(
        "Starting Locavia Rental Engine v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = AppConfig::load().expect("Failed to load configuration");

    info!("Connecting to database...");
    let pool = create_pool(&config.database.url, Some(config.database.max_connections))
        .await
        .expect("Failed to create database pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Shared service instances; web::Data adds its own Arc for the workers
    let settings_repo = Arc::new(PgSettingsRepository::new(pool.clone()));
    let shared_pool = Arc::new(pool.clone());
    let rental_manager = web::Data::new(PgRentalManager::new(
        settings_repo.clone(),
        shared_pool.clone(),
    ));
    let analytics_engine = web::Data::new(PgAnalyticsEngine::new(
        settings_repo,
        shared_pool,
        config.rental.clone(),
    ));

    // CORS configuration
    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let bind_addr = config.server_addr();
    let workers = config.server.workers;
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    let app_config = web::Data::new(config);

    // Create and run server
    HttpServer::new(move || {
        // Configure CORS - clone cors_origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::ACCEPT,
                header::CONTENT_TYPE,
                header::HeaderName::from_static("x-tenant-id"),
                header::HeaderName::from_static("x-user-id"),
            ])
            .max_age(3600);

        App::new()
            // Add database pool and shared services to app data
            .app_data(web::Data::new(pool.clone()))
            .app_data(rental_manager.clone())
            .app_data(analytics_engine.clone())
            .app_data(app_config.clone())
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_query",
                        "message": error_message
                    })),
                )
                .into()
            }))
            // Middleware
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            // Configure routes
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
