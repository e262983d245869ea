pub use sea_orm_migration::prelude::*;

mod m20241101_000001_create_users_table;
mod m20241101_000002_create_music_manager_users_table;
mod m20241101_000003_create_sessions_table;
mod m20241101_000004_create_albums_table;
mod m20241101_000005_create_songs_table;
mod m20241101_000006_create_album_tracklist_items_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241101_000001_create_users_table::Migration),
            Box::new(m20241101_000002_create_music_manager_users_table::Migration),
            Box::new(m20241101_000003_create_sessions_table::Migration),
            Box::new(m20241101_000004_create_albums_table::Migration),
            Box::new(m20241101_000005_create_songs_table::Migration),
            Box::new(m20241101_000006_create_album_tracklist_items_table::Migration),
        ]
    }
}
