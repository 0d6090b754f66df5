mod api_handlers;
mod auth;
mod cache;
mod database;
mod request_logging;
mod search;
mod seed;
mod validation;

use auth::AuthKeys;
use cache::QueryCache;
use clap::{Parser, Subcommand};
use database::Database;
use poem::{
    handler, listener::TcpListener, middleware::Cors, web::Json, EndpointExt, Route, Server,
};
use request_logging::RequestLogging;
use search::SearchService;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "api-server")]
#[command(about = "Property Listing API Server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Import the property catalog from a CSV file
    Seed {
        #[arg(default_value = "dataset.csv")]
        file: PathBuf,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct HealthResponse {
    success: bool,
    message: String,
    environment: String,
}

struct AppContext {
    database: Arc<Database>,
    search: Arc<SearchService<Database>>,
    auth_keys: Arc<AuthKeys>,
}

async fn setup_database() -> Result<Arc<Database>, std::io::Error> {
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./properties.db?mode=rwc".to_string());
    match Database::new(&database_url).await {
        Ok(db) => {
            tracing::info!("Database initialized at {}", database_url);
            Ok(Arc::new(db))
        }
        Err(e) => {
            tracing::error!("Failed to initialize database at {}: {}", database_url, e);
            Err(std::io::Error::other(format!(
                "Database initialization failed: {}",
                e
            )))
        }
    }
}

async fn setup_app_context() -> Result<AppContext, std::io::Error> {
    let database = setup_database().await?;

    let auth_keys = Arc::new(AuthKeys {
        secret: env::var("JWT_SECRET").expect("JWT_SECRET environment variable required"),
    });

    let cache_ttl_secs = env::var("CACHE_TTL_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse::<u64>()
        .unwrap_or(60);
    let cache = Arc::new(QueryCache::new(Duration::from_secs(cache_ttl_secs)));
    tracing::info!("Query cache TTL set to {}s", cache_ttl_secs);

    let search = Arc::new(SearchService::new(database.clone(), cache));

    Ok(AppContext {
        database,
        search,
        auth_keys,
    })
}

#[handler]
async fn health() -> Json<HealthResponse> {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    Json(HealthResponse {
        success: true,
        message: "Property Listing API is running".to_string(),
        environment,
    })
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let cli = Cli::parse();

    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve => serve_command().await,
        Commands::Seed { file } => seed_command(&file).await,
    }
}

async fn serve_command() -> Result<(), std::io::Error> {
    let port = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    let ctx = setup_app_context().await?;

    tracing::info!("Starting Property Listing API server on {}", addr);

    let app = Route::new()
        // Health check
        .at("/api/v1/health", poem::get(health))
        // Auth
        .at("/api/register", poem::post(api_handlers::register))
        .at("/api/login", poem::post(api_handlers::login))
        // Properties
        .at(
            "/api/properties",
            poem::get(api_handlers::list_properties).post(api_handlers::create_property),
        )
        .at(
            "/api/properties/:id",
            poem::put(api_handlers::update_property).delete(api_handlers::delete_property),
        )
        // Favorites
        .at(
            "/api/favorites",
            poem::get(api_handlers::list_favorites).post(api_handlers::add_favorite),
        )
        .at(
            "/api/favorites/:id",
            poem::delete(api_handlers::remove_favorite),
        )
        // Recommendations
        .at("/api/recommend", poem::post(api_handlers::recommend))
        .at(
            "/api/recommendations",
            poem::get(api_handlers::received_recommendations),
        )
        .at(
            "/api/sent-recommendations",
            poem::get(api_handlers::sent_recommendations),
        )
        .data(ctx.database)
        .data(ctx.search)
        .data(ctx.auth_keys)
        .with(Cors::new())
        .with(RequestLogging);

    Server::new(TcpListener::bind(&addr)).run(app).await
}

async fn seed_command(file: &std::path::Path) -> Result<(), std::io::Error> {
    let database = setup_database().await?;

    match seed::import_csv(&database, file).await {
        Ok(count) => {
            tracing::info!("Seeded {} properties from {}", count, file.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Seeding failed: {:#}", e);
            Err(std::io::Error::other(format!("Seeding failed: {}", e)))
        }
    }
}
