mod config;
mod core;
mod models;
mod routes;
mod services;

use crate::core::CompatibilityScorer;
use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware, web, App, HttpServer};
use config::Settings;
use routes::process::AppState;
use services::{OpenAiClient, S3Store};
use std::sync::Arc;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Lume Spark scoring service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the object store client
    let store = Arc::new(S3Store::from_settings(&settings.storage).await);

    info!(
        "Object store initialized (bucket: {}, region: {})",
        settings.storage.bucket, settings.storage.region
    );

    // Initialize the inference client
    let inference = Arc::new(OpenAiClient::from_settings(&settings.inference));

    info!("Inference client initialized (model: {})", settings.inference.model);

    // Build the scorer with both collaborators injected
    let scorer = Arc::new(CompatibilityScorer::new(store, inference, &settings.storage));

    let app_state = AppState { scorer };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
            .service(Files::new("/", "./static").index_file("index.html"))
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
