//! Employee Registry Backend
//!
//! A REST backend managing employee records with role-based access control
//! and a soft-delete/restore lifecycle, persisted in SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod storage;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::TokenService;
use config::Config;
use db::Repository;
use storage::PhotoStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub photos: Arc<PhotoStore>,
    pub tokens: Arc<TokenService>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Employee Registry Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Photo directory: {:?}", config.photo_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if insecure defaults are in use
    if config.jwt_secret == config::INSECURE_DEV_SECRET {
        tracing::warn!("EMR_JWT_SECRET not set, using insecure development secret!");
    }
    if config.bootstrap_admin_password == config::INSECURE_DEV_PASSWORD {
        tracing::warn!("EMR_BOOTSTRAP_ADMIN_PASSWORD not set, using insecure default!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Guarantee the bootstrap admin exists before serving any request
    let bootstrap_hash = auth::password::hash(&config.bootstrap_admin_password)?;
    repo.ensure_bootstrap_admin(&config.bootstrap_admin_email, &bootstrap_hash)
        .await?;

    let photos = Arc::new(PhotoStore::new(config.photo_dir.clone()));
    let tokens = Arc::new(TokenService::new(
        &config.jwt_secret,
        config.token_ttl_minutes,
    ));

    // Create application state
    let state = AppState {
        repo,
        photos,
        tokens,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Admin-only routes; the admin flag is resolved from the role store
    let admin_routes = Router::new()
        .route("/employees", post(api::create_employee))
        .route("/employees/{id_number}", put(api::update_employee))
        .route("/employees/{id_number}", delete(api::delete_employee))
        .route("/deletedEmployees", get(api::list_deleted_employees))
        .route("/deletedEmployees/{id_number}", get(api::get_deleted_employee))
        .route(
            "/deletedEmployees/restore/{id_number}",
            post(api::restore_employee),
        )
        .route("/admins", get(api::list_admins))
        .route("/admins/promote", post(api::promote_admin))
        .route("/admins/demote", post(api::demote_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    // Routes requiring any authenticated caller
    let protected_routes = Router::new()
        .route("/employees", get(api::list_employees))
        .route("/employees/{id_number}", get(api::get_employee))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    // Public routes: account creation, login, health check
    let public_routes = Router::new()
        .route("/admins/register", post(api::register))
        .route("/admins/login", post(api::login))
        .route("/health", get(health_check));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .nest_service("/photos", ServeDir::new(state.photos.root()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
