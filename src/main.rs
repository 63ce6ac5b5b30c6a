// src/main.rs
use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use log::{info, warn};
use std::sync::Arc;

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use crate::config::Config;
use crate::handlers::analyze_crop;
use crate::models::HealthStatus;
use crate::services::{CropAnalyzer, DiagnosisProvider};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    analyzer: Arc<dyn DiagnosisProvider>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting AI crop disease analyzer...");

    let config = Arc::new(Config::from_env()?);
    if !config.has_api_key() {
        warn!("OPENROUTER_API_KEY is not set; analysis requests will be rejected");
    }

    let analyzer = Arc::new(CropAnalyzer::new(config.clone())?);

    let app_state = AppState {
        config: config.clone(),
        analyzer,
    };

    info!(
        "Starting HTTP server on {}:{} (max upload {}MB)",
        config.host, config.port, config.max_file_size_mb
    );

    let static_dir = config.static_dir.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/api")
                    .route("/analyze", web::post().to(analyze_crop))
                    .route("/health", web::get().to(health_check)),
            )
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

async fn health_check(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy",
        message: "AI Crop Disease Analyzer API is running",
        openrouter_configured: data.config.has_api_key(),
        max_file_size_mb: data.config.max_file_size_mb,
    })
}
