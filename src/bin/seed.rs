use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use label_music_manager::{config::Config, seed};
use migration::MigratorTrait;
use sea_orm::Database;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;
    label_music_manager::init_tracing(config.log_format);

    let path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: seed <path-to-seed.json>")?;
    let data = seed::load_file(&path)?;

    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    migration::Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;

    let report = seed::run(&db, &data, config.session_ttl_hours).await?;
    tracing::info!(
        albums = report.albums_created,
        songs = report.songs_created,
        links = report.links_created,
        users = report.users_created,
        skipped = report.skipped,
        "Seeding finished"
    );

    Ok(())
}
