use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use venue_match::config::{CatalogBackend, LoggingSettings, Settings};
use venue_match::core::Matcher;
use venue_match::routes::{self, AppState};
use venue_match::services::{CacheManager, MemoryCatalog, PostgresClient, RestCatalogClient, VenueCatalog};

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

async fn build_catalog(settings: &Settings) -> std::io::Result<VenueCatalog> {
    let table = &settings.catalog.table;

    let catalog = match settings.catalog.backend {
        CatalogBackend::Postgres => {
            let db = &settings.database;
            let client = PostgresClient::from_settings(
                &db.url,
                table,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            info!(
                "PostgreSQL catalog initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            VenueCatalog::Postgres(client)
        }
        CatalogBackend::Rest => {
            let rest = &settings.rest;
            let client = RestCatalogClient::new(
                rest.endpoint.clone(),
                rest.api_key.clone(),
                table.clone(),
                Duration::from_secs(rest.timeout_secs.unwrap_or(30)),
            )
            .map_err(|e| startup_error("Failed to create REST client", e))?;

            info!("REST catalog initialized ({})", rest.endpoint);
            VenueCatalog::Rest(client)
        }
        CatalogBackend::Memory => {
            let catalog = match &settings.catalog.seed_path {
                Some(path) => MemoryCatalog::from_file(path)
                    .map_err(|e| startup_error("Failed to load venue seed file", e))?,
                None => MemoryCatalog::default(),
            };

            if catalog.is_empty() {
                warn!("Memory catalog is empty, every match request will return no venues");
            } else {
                info!("Memory catalog initialized ({} venues)", catalog.len());
            }
            VenueCatalog::Memory(catalog)
        }
    };

    Ok(catalog)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            // Logging isn't configured yet
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting venue matching service...");

    let catalog = Arc::new(build_catalog(&settings).await?);

    let cache = if settings.cache.enabled {
        let ttl = settings.cache.ttl_secs.unwrap_or(300);
        let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);
        let cache = CacheManager::connect_or_local(settings.cache.redis_url.as_deref(), l1_size, ttl).await;

        info!(
            "Cache manager initialized (L1: {} entries, TTL: {}s, redis: {})",
            l1_size,
            ttl,
            cache.has_shared_tier()
        );
        Some(Arc::new(cache))
    } else {
        info!("Catalog caching disabled");
        None
    };

    let match_config = settings.match_config();
    let matcher = Matcher::new(match_config);

    info!("Matcher initialized with {:?}", match_config);

    let app_state = AppState {
        catalog,
        cache,
        matcher,
    };

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
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
