mod api;
mod config;
mod database;
mod middleware;
mod models;
mod patch;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AppConfig, ConfigError, StoreBackend};
use crate::database::{InMemoryUserStore, MongoUserStore, UserStore};
use crate::patch::SerdeCodec;
use crate::services::UserService;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    log::info!("🚀 Starting User Service...");
    log::info!("🗄️  Store backend: {}", config.store_backend);

    let store = build_store(&config).await?;
    let service = web::Data::new(UserService::new(store, Arc::new(SerdeCodec)));
    let config_data = web::Data::new(config.clone());

    if config.legacy_null_on_missing {
        log::warn!("⚠️  LEGACY_NULL_ON_MISSING enabled: unknown ids answer 200 null");
    }

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    let allowed_origins = config.allowed_origins.clone();

    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(service.clone())
            .app_data(config_data.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

async fn build_store(config: &AppConfig) -> io::Result<Arc<dyn UserStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            log::warn!("⚠️  Using in-memory store: data is lost on restart");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
        StoreBackend::MongoDb => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, ConfigError::MissingDatabaseUrl)
            })?;

            log::info!("📊 Database: {}", config.database_name);
            let db = database::MongoDB::new(url, &config.database_name)
                .await
                .map_err(|e| {
                    log::error!("❌ Failed to connect to MongoDB: {}", e);
                    io::Error::other(e)
                })?;
            log::info!("✅ MongoDB connected successfully");

            Ok(Arc::new(MongoUserStore::new(&db)))
        }
    }
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
