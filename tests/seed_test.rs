//! Seed loader tests

use std::io::Write;

use label_music_manager::db::entities::{album, album_tracklist_item, song, user};
use label_music_manager::seed;
use label_music_manager::test_utils::*;
use pretty_assertions::assert_eq;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

const SEED_JSON: &str = r#"{
  "albums": [
    {"title": "Kind of Blue", "description": "Modal jazz.", "artist": "Miles Davis",
     "price": 14.99, "format": "VL", "release_date": "1959-08-17", "cover": "kob.jpg"},
    {"title": "Kind of Blue", "description": "", "artist": "Miles Davis",
     "price": "9.99", "format": "CD", "release_date": "1997-03-01"},
    {"title": "", "artist": "Nobody", "price": "1", "format": "CD", "release_date": "2000-01-01"}
  ],
  "songs": [
    {"title": "So What", "runtime": 562, "albums": ["Kind of Blue"]},
    {"title": "Freddie Freeloader", "runtime": 589, "albums": ["Kind of Blue", "Missing"]},
    {"title": "Too Short", "runtime": 3, "albums": []}
  ],
  "users": [
    {"username": "editor", "password": "pw-editor", "display_name": "Editor", "role": "editor"},
    {"username": "miles", "password": "pw-miles", "display_name": "Miles Davis", "role": "artist"}
  ]
}"#;

async fn counts(db: &DatabaseConnection) -> (u64, u64, u64, u64) {
    (
        album::Entity::find().count(db).await.unwrap(),
        song::Entity::find().count(db).await.unwrap(),
        album_tracklist_item::Entity::find().count(db).await.unwrap(),
        user::Entity::find().count(db).await.unwrap(),
    )
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let db = setup_test_db().await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SEED_JSON.as_bytes()).unwrap();

    let data = seed::load_file(file.path()).unwrap();

    let first = seed::run(&db, &data, 1).await.unwrap();
    assert_eq!(first.albums_created, 2);
    assert_eq!(first.songs_created, 2);
    assert_eq!(first.links_created, 4);
    assert_eq!(first.users_created, 2);
    assert_eq!(first.skipped, 2);
    let after_first = counts(&db).await;

    let second = seed::run(&db, &data, 1).await.unwrap();
    assert_eq!(second.albums_created + second.songs_created + second.links_created, 0);
    assert_eq!(second.users_created, 0);
    assert_eq!(counts(&db).await, after_first);
}

#[tokio::test]
async fn test_seed_uses_cover_and_slug() {
    let db = setup_test_db().await;
    let data: seed::SeedFile = serde_json::from_str(SEED_JSON).unwrap();
    seed::run(&db, &data, 1).await.unwrap();

    let albums = album::Entity::find().all(&db).await.unwrap();
    assert_eq!(albums[0].cover_image, "kob.jpg");
    assert_eq!(albums[0].price_cents, 1499);
    assert_eq!(albums[1].cover_image, "no_cover.jpg");
    assert!(albums.iter().all(|a| a.slug == "kind-of-blue"));
}

#[test]
fn test_load_file_reports_bad_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();

    let err = seed::load_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("is not valid seed JSON"));
}
