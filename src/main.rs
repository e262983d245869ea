use anyhow::{Context, Result};
use dotenvy::dotenv;
use label_music_manager::{config::Config, create_router, state::AppState};
use migration::MigratorTrait;
use sea_orm::Database;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;
    label_music_manager::init_tracing(config.log_format);

    tracing::info!("Starting Label Music Manager...");

    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    migration::Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations completed");

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("SERVER_HOST and SERVER_PORT must form a socket address")?;

    let state = AppState::new(db, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
