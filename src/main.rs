use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use gradjobs::config::{LoggingSettings, Settings};
use gradjobs::core::Matcher;
use gradjobs::routes::{self, AppState};
use gradjobs::services::{CatalogCache, LogNotifier, Store, TokenService};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting gradjobs service...");

    if settings.auth.jwt_secret == "change-me" {
        warn!("Using the default JWT secret; set JWT_SECRET in production");
    }

    let db_max_conn = settings.database.max_connections.unwrap_or(5);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);
    let acquire_timeout = Duration::from_secs(settings.database.acquire_timeout_secs.unwrap_or(5));

    let store = Store::connect(&settings.database.url, db_max_conn, db_min_conn, acquire_timeout)
        .await
        .map_err(|e| {
            error!("Failed to open database {}: {}", settings.database.url, e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;

    info!("Database ready (max: {} connections)", db_max_conn);

    let cache = CatalogCache::new(settings.cache.l1_cache_size, settings.cache.ttl_secs);

    info!(
        "Catalog cache initialized ({} entries, TTL: {}s)",
        settings.cache.l1_cache_size, settings.cache.ttl_secs
    );

    let matcher = Matcher::new(settings.scoring_weights(), settings.admission_thresholds());

    info!(
        "Matcher initialized with weights: {:?}, thresholds: {:?}",
        matcher.weights(),
        matcher.thresholds()
    );

    let app_state = AppState {
        store: Arc::new(store),
        tokens: Arc::new(TokenService::new(
            &settings.auth.jwt_secret,
            settings.auth.token_ttl_secs,
        )),
        cache: Arc::new(cache),
        notifier: Arc::new(LogNotifier::new(
            settings.notifications.enabled,
            settings.notifications.sender.clone(),
        )),
        matcher,
        allow_admin_registration: settings.auth.allow_admin_registration,
    };

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
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
