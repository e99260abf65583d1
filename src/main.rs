use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use hackmatch::config::{LoggingSettings, Settings};
use hackmatch::core::Matcher;
use hackmatch::models::ErrorResponse;
use hackmatch::routes::{self, matches::AppState};
use hackmatch::services::{InMemoryMatchRepository, ProfileStore};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON body for extractor failures
#[derive(Debug)]
struct PayloadError(ErrorResponse);

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl error::ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

fn payload_error(error: &str, message: String) -> actix_web::Error {
    PayloadError(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
    .into()
}

fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    info!("JSON payload error on {}: {}", req.path(), err);
    payload_error("invalid_json", format!("Invalid JSON: {}", err))
}

fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    payload_error("invalid_query", format!("Invalid query: {}", err))
}

/// RUST_LOG wins over the configured level
fn init_tracing(logging: &LoggingSettings) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)?,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let result = if logging.format == "pretty" {
        subscriber.pretty().try_init()
    } else {
        subscriber.compact().try_init()
    };
    result.map_err(Into::into)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_tracing(&settings.logging).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    info!("Starting HackMatch team matching service...");

    let profiles = match &settings.matching.profiles_path {
        Some(path) => ProfileStore::load_from_file(path).await.map_err(|e| {
            error!("Failed to load profiles from {}: {}", path, e);
            std::io::Error::new(std::io::ErrorKind::InvalidData, e)
        })?,
        None => {
            warn!("No profiles_path configured, starting with an empty pool");
            ProfileStore::new()
        }
    };

    let mut matcher = Matcher::new(settings.matcher_config());
    if let Some(threads) = settings.matching.worker_threads {
        matcher = matcher
            .with_worker_threads(threads)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        info!("Scoring pool started with {} threads", threads);
    }

    info!("Matcher initialized with weights: {:?}", matcher.config().weights);

    let app_state = AppState {
        profiles: Arc::new(profiles),
        repository: Arc::new(InMemoryMatchRepository::new()),
        matcher,
        defaults: settings.default_match_options(),
        match_ttl: chrono::Duration::hours(settings.matching.match_ttl_hours),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
