//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        db::PgIdeaStore, identity::ProfileIdentityProvider, memory::InMemoryIdeaStore,
        session_cache::FileSessionCache,
    },
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use axum::Router;
use idea_ranker_core::{IdeaService, IdeaStore, SessionManager};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Choose the Idea Store ---
    let store: Arc<dyn IdeaStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let pg_store = PgIdeaStore::new(db_pool);
            info!("Running database migrations...");
            pg_store.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(pg_store)
        }
        None => {
            warn!("DATABASE_URL is not set; ideas will be kept in memory only");
            Arc::new(InMemoryIdeaStore::new())
        }
    };

    // --- 3. Restore the Session & Follow Identity Changes ---
    let provider = Arc::new(ProfileIdentityProvider::new(config.identity.clone()));
    let cache = Arc::new(FileSessionCache::new(config.session_cache_path.clone()));
    let sessions = Arc::new(SessionManager::new(provider, cache));
    sessions.restore().await;

    let watcher = sessions.clone();
    tokio::spawn(async move { watcher.watch_session_changes().await });

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        ideas: IdeaService::new(store),
        sessions,
    });

    // --- 5. Create the Web Router ---
    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        api_lib::config::ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(web::router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
