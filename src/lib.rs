//! Label Music Manager
//!
//! Album and song catalog for a record label, with a server-rendered UI and a
//! JSON API sharing one permission model.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod permissions;
pub mod seed;
pub mod services;
pub mod state;
pub mod templates;
pub mod test_utils;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::LogFormat;
use state::AppState;

pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "label_music_manager=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

pub fn create_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);
    let media_dir = ServeDir::new(&state.config.media_dir);

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // API routes (JSON)
        .nest("/api", handlers::api_routes())

        // HTML routes (maud)
        .merge(handlers::html_routes())
        .fallback(handlers::html::not_found)

        // Stylesheets and cover images
        .nest_service("/static", static_dir)
        .nest_service("/media", media_dir)

        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
