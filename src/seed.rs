//! Bulk loading of sample catalog data.
//!
//! Every record is looked up by its natural key first, so loading the same
//! file twice leaves the database unchanged.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;

use crate::db::entities::{album, album_tracklist_item, song};
use crate::db::enums::Role;
use crate::db::repositories::{AlbumRepository, SongRepository, TracklistRepository, UserRepository};
use crate::error::Result;
use crate::services::auth::AuthService;
use crate::services::slug::slugify;
use crate::services::validation::{AlbumForm, SongForm};

#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub albums: Vec<SeedAlbum>,
    #[serde(default)]
    pub songs: Vec<SeedSong>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Deserialize)]
pub struct SeedAlbum {
    #[serde(flatten)]
    pub form: AlbumForm,
    #[serde(default)]
    pub cover: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedSong {
    pub title: String,
    /// Length in seconds.
    pub runtime: i32,
    /// Titles of the albums this song appears on.
    #[serde(default)]
    pub albums: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub albums_created: usize,
    pub songs_created: usize,
    pub links_created: usize,
    pub users_created: usize,
    pub skipped: usize,
}

pub fn load_file(path: &Path) -> anyhow::Result<SeedFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Seed file {} is not valid seed JSON", path.display()))
}

pub async fn run(db: &DatabaseConnection, data: &SeedFile, session_ttl_hours: i64) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let today = Utc::now().date_naive();

    let albums = AlbumRepository::new(db);
    for entry in &data.albums {
        let mut form = entry.form.clone();
        if let Some(cover) = entry.cover.as_deref().filter(|c| !c.is_empty()) {
            form.cover_image = cover.to_string();
        }

        let fields = match form.validate(today) {
            Ok(fields) => fields,
            Err(errors) => {
                tracing::warn!(title = %form.title, %errors, "Skipping invalid album");
                report.skipped += 1;
                continue;
            }
        };

        if albums
            .find_by_natural_key(&fields.title, &fields.artist, fields.format)
            .await?
            .is_some()
        {
            continue;
        }

        let now = Utc::now();
        let created = albums
            .create(album::ActiveModel {
                slug: Set(slugify(&fields.title)),
                title: Set(fields.title),
                description: Set(fields.description),
                artist: Set(fields.artist),
                price_cents: Set(fields.price_cents),
                format: Set(fields.format),
                release_date: Set(fields.release_date),
                cover_image: Set(fields.cover_image),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            })
            .await?;
        tracing::info!(album_id = created.id, title = %created.title, "Album created");
        report.albums_created += 1;
    }

    let songs = SongRepository::new(db);
    let tracklist = TracklistRepository::new(db);
    for entry in &data.songs {
        let form = SongForm {
            title: entry.title.clone(),
            length: entry.runtime.to_string(),
        };
        let fields = match form.validate() {
            Ok(fields) => fields,
            Err(errors) => {
                tracing::warn!(title = %entry.title, %errors, "Skipping invalid song");
                report.skipped += 1;
                continue;
            }
        };

        let song = match songs.find_by_title_and_length(&fields.title, fields.length).await? {
            Some(existing) => existing,
            None => {
                let created = songs
                    .create(song::ActiveModel {
                        title: Set(fields.title),
                        length: Set(fields.length),
                        created_at: Set(Utc::now().into()),
                        ..Default::default()
                    })
                    .await?;
                tracing::info!(song_id = created.id, title = %created.title, "Song created");
                report.songs_created += 1;
                created
            }
        };

        for album_title in &entry.albums {
            let matches = albums.find_by_title(album_title).await?;
            if matches.is_empty() {
                tracing::warn!(album = %album_title, song = %song.title, "No albums found with title");
            }
            for album in matches {
                if tracklist.find_pair(album.id, song.id).await?.is_some() {
                    continue;
                }
                tracklist
                    .create(album_tracklist_item::ActiveModel {
                        album_id: Set(album.id),
                        song_id: Set(song.id),
                        position: Set(None),
                        ..Default::default()
                    })
                    .await?;
                report.links_created += 1;
            }
        }
    }

    let users = UserRepository::new(db);
    let auth = AuthService::new(db, session_ttl_hours);
    for entry in &data.users {
        if users.find_by_username(&entry.username).await?.is_some() {
            continue;
        }
        auth.create_user(&entry.username, &entry.password, &entry.display_name, entry.role)
            .await?;
        report.users_created += 1;
    }

    Ok(report)
}
