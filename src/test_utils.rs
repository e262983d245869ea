//! Test utilities for Label Music Manager
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory SQLite databases (one per test)
//! - AppState factories
//! - Test data generators for albums, songs, tracklists, users and sessions

use chrono::{Duration, NaiveDate, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::{
    config::{Config, LogFormat},
    db::{
        entities::{album, album_tracklist_item, music_manager_user, session, song, user},
        enums::{AlbumFormat, Role},
    },
    services::{
        auth::{generate_token, hash_password, hash_token},
        slug::slugify,
    },
    state::AppState,
};

pub const TEST_PASSWORD: &str = "s3cret-passw0rd";

/// Setup an in-memory SQLite database with all migrations applied
///
/// Each call creates a fresh, isolated database perfect for parallel testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test configuration with sensible defaults
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        session_ttl_hours: 1,
        media_dir: "media".to_string(),
        static_dir: "static".to_string(),
        log_format: LogFormat::Pretty,
    }
}

/// Create a complete test AppState with an isolated database
pub async fn setup_test_app_state() -> AppState {
    AppState::new(setup_test_db().await, test_config())
}

// ============================================================================
// Test Data Factories
// ============================================================================

/// Create a CD album released on 2020-01-01 with a 9.99 price
pub async fn create_test_album(db: &DatabaseConnection, title: &str, artist: &str) -> album::Model {
    let now = Utc::now().into();
    let album = album::ActiveModel {
        title: Set(title.to_string()),
        description: Set(String::new()),
        artist: Set(artist.to_string()),
        price_cents: Set(999),
        format: Set(AlbumFormat::Cd),
        release_date: Set(NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date")),
        cover_image: Set("no_cover.jpg".to_string()),
        slug: Set(slugify(title)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    album.insert(db).await.expect("Failed to insert test album")
}

pub async fn create_test_song(db: &DatabaseConnection, title: &str, length: i32) -> song::Model {
    let song = song::ActiveModel {
        title: Set(title.to_string()),
        length: Set(length),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    song.insert(db).await.expect("Failed to insert test song")
}

pub async fn create_test_tracklist_item(
    db: &DatabaseConnection,
    album_id: i32,
    song_id: i32,
    position: Option<i32>,
) -> album_tracklist_item::Model {
    let item = album_tracklist_item::ActiveModel {
        album_id: Set(album_id),
        song_id: Set(song_id),
        position: Set(position),
        ..Default::default()
    };

    item.insert(db).await.expect("Failed to insert test tracklist item")
}

/// Create a user without a music manager profile; password is [`TEST_PASSWORD`]
pub async fn create_test_principal(db: &DatabaseConnection, username: &str) -> user::Model {
    let user = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(TEST_PASSWORD).expect("Failed to hash password")),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    user.insert(db).await.expect("Failed to insert test user")
}

/// Create a user with a profile; the display name doubles as the artist name
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    display_name: &str,
    role: Role,
) -> (user::Model, music_manager_user::Model) {
    let user = create_test_principal(db, username).await;
    let profile = music_manager_user::ActiveModel {
        user_id: Set(user.id),
        display_name: Set(display_name.to_string()),
        role: Set(role),
        ..Default::default()
    };
    let profile = profile.insert(db).await.expect("Failed to insert test profile");

    (user, profile)
}

/// Open a session for `user_id` and return its bearer token
pub async fn create_test_session(db: &DatabaseConnection, user_id: i32) -> String {
    let token = generate_token();
    let now = Utc::now();
    let session = session::ActiveModel {
        token_hash: Set(hash_token(&token)),
        user_id: Set(user_id),
        expires_at: Set((now + Duration::hours(1)).into()),
        created_at: Set(now.into()),
        ..Default::default()
    };
    session.insert(db).await.expect("Failed to insert test session");

    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        let albums = album::Entity::find().all(&db).await.unwrap();
        assert_eq!(albums.len(), 0);
    }

    #[tokio::test]
    async fn test_create_test_album() {
        let db = setup_test_db().await;
        let album = create_test_album(&db, "Kind of Blue", "Miles Davis").await;

        assert_eq!(album.title, "Kind of Blue");
        assert_eq!(album.slug, "kind-of-blue");
        assert_eq!(album.format, AlbumFormat::Cd);
    }

    #[tokio::test]
    async fn test_create_test_user_with_profile() {
        let db = setup_test_db().await;
        let (user, profile) = create_test_user(&db, "miles", "Miles Davis", Role::Artist).await;

        assert_eq!(profile.user_id, user.id);
        assert_eq!(profile.role, Role::Artist);
    }

    #[tokio::test]
    async fn test_parallel_databases() {
        let (db1, db2) = tokio::join!(setup_test_db(), setup_test_db());

        let song1 = create_test_song(&db1, "So What", 545).await;
        let song2 = create_test_song(&db2, "Blue in Green", 337).await;

        // Both should be ID 1 (separate databases)
        assert_eq!(song1.id, 1);
        assert_eq!(song2.id, 1);

        let db1_songs = song::Entity::find().all(&db1).await.unwrap();
        let db2_songs = song::Entity::find().all(&db2).await.unwrap();
        assert_eq!(db1_songs.len(), 1);
        assert_eq!(db2_songs.len(), 1);
        assert_eq!(db1_songs[0].title, "So What");
        assert_eq!(db2_songs[0].title, "Blue in Green");
    }
}
