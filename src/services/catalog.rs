//! Album operations: listing, lookup, create, edit and delete.
//!
//! Every write checks permissions before validating input, and validates input
//! before opening the transaction that persists it.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, SqlErr, TransactionTrait};
use serde::Serialize;

use crate::db::entities::{album, album_tracklist_item, song};
use crate::db::repositories::{sort_tracklist, AlbumRepository, SongRepository, TracklistRepository};
use crate::error::{AppError, FieldErrors, Result, NON_FIELD_ERRORS};
use crate::permissions::{self, Actor, Operation};
use crate::services::slug::slugify;
use crate::services::validation::{check_track_selection, AlbumFields, AlbumForm, TrackSelection};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackEntry {
    pub item: album_tracklist_item::Model,
    pub song: song::Model,
}

/// An album with its tracklist in natural order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumDetail {
    pub album: album::Model,
    pub tracks: Vec<TrackEntry>,
}

impl AlbumDetail {
    fn from_rows(album: album::Model, mut rows: Vec<(album_tracklist_item::Model, song::Model)>) -> Self {
        sort_tracklist(&mut rows);
        Self {
            album,
            tracks: rows
                .into_iter()
                .map(|(item, song)| TrackEntry { item, song })
                .collect(),
        }
    }

    /// Sum of linked song lengths, in seconds.
    pub fn total_playtime(&self) -> i64 {
        self.tracks.iter().map(|t| i64::from(t.song.length)).sum()
    }

    pub fn songs(&self) -> impl Iterator<Item = &song::Model> {
        self.tracks.iter().map(|t| &t.song)
    }
}

const DUPLICATE_ALBUM: &str = "Album with this Title, Artist and Format already exists.";

/// A write that lost the race on the (title, artist, format) index reports
/// the same form error as the up-front check.
pub(crate) fn duplicate_album_error(err: AppError) -> AppError {
    match &err {
        AppError::Database(db)
            if matches!(db.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
        {
            AppError::Validation(FieldErrors::single(NON_FIELD_ERRORS, DUPLICATE_ALBUM))
        }
        _ => err,
    }
}

pub(crate) fn require_login(actor: Option<&Actor>) -> Result<&Actor> {
    actor.ok_or(AppError::LoginRequired)
}

/// Run the resolver and log denials.
pub(crate) fn ensure(actor: &Actor, op: Operation, album_artist: Option<&str>) -> Result<()> {
    let decision = permissions::authorize(Some(actor), op, album_artist);
    if !decision.is_allowed() {
        tracing::warn!(
            user_id = actor.user_id,
            role = actor.role.code(),
            operation = ?op,
            "Permission denied"
        );
    }
    decision.into_result()
}

pub struct CatalogService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CatalogService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Albums visible to `actor`, each with its ordered tracklist.
    pub async fn list_albums(&self, actor: Option<&Actor>) -> Result<Vec<AlbumDetail>> {
        let scope = permissions::read_scope(actor);
        let albums = AlbumRepository::new(self.db)
            .list(scope.artist_filter())
            .await?;

        let ids: Vec<i32> = albums.iter().map(|a| a.id).collect();
        let mut by_album: HashMap<i32, Vec<(album_tracklist_item::Model, song::Model)>> =
            HashMap::new();
        for (item, song) in TracklistRepository::new(self.db).for_albums(&ids).await? {
            by_album.entry(item.album_id).or_default().push((item, song));
        }

        Ok(albums
            .into_iter()
            .map(|album| {
                let rows = by_album.remove(&album.id).unwrap_or_default();
                AlbumDetail::from_rows(album, rows)
            })
            .collect())
    }

    /// Look an album up by id, or by id and slug. A slug that does not match is Not-Found.
    pub async fn get_album(&self, id: i32, slug: Option<&str>) -> Result<AlbumDetail> {
        let albums = AlbumRepository::new(self.db);
        let album = match slug {
            Some(slug) => albums.find_by_id_and_slug(id, slug).await?,
            None => albums.find_by_id(id).await?,
        }
        .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        let rows = TracklistRepository::new(self.db).for_album(album.id).await?;
        Ok(AlbumDetail::from_rows(album, rows))
    }

    pub fn authorize_create(&self, actor: Option<&Actor>) -> Result<()> {
        let actor = require_login(actor)?;
        ensure(actor, Operation::CreateAlbum, None)
    }

    /// The album `actor` is about to edit, once edit rights are confirmed.
    pub async fn authorize_edit(&self, actor: Option<&Actor>, id: i32) -> Result<AlbumDetail> {
        let actor = require_login(actor)?;
        let detail = self.get_album(id, None).await?;
        ensure(actor, Operation::EditAlbum, Some(&detail.album.artist))?;
        Ok(detail)
    }

    pub async fn authorize_delete(&self, actor: Option<&Actor>, id: i32) -> Result<album::Model> {
        let actor = require_login(actor)?;
        let album = self.find_album(id).await?;
        ensure(actor, Operation::DeleteAlbum, Some(&album.artist))?;
        Ok(album)
    }

    pub async fn create_album(
        &self,
        actor: Option<&Actor>,
        form: &AlbumForm,
        tracks: &[TrackSelection],
    ) -> Result<album::Model> {
        self.authorize_create(actor)?;
        let fields = self.validate_album(form, Some(tracks), None).await?;

        let now = Utc::now();
        let txn = self.db.begin().await?;
        let created = AlbumRepository::new(&txn)
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
            .await
            .map_err(duplicate_album_error)?;
        TracklistRepository::new(&txn)
            .replace_membership(created.id, tracks)
            .await?;
        txn.commit().await?;

        tracing::info!(album_id = created.id, title = %created.title, tracks = tracks.len(), "Album created");
        Ok(created)
    }

    /// Update album fields and, when `tracks` is given, replace its membership.
    ///
    /// Replacement clears every existing item before inserting the new
    /// selection, so positions only survive when resupplied. The slug is not
    /// touched.
    pub async fn edit_album(
        &self,
        actor: Option<&Actor>,
        id: i32,
        form: &AlbumForm,
        tracks: Option<&[TrackSelection]>,
    ) -> Result<AlbumDetail> {
        let current = self.authorize_edit(actor, id).await?;
        let fields = self.validate_album(form, tracks, Some(id)).await?;

        let txn = self.db.begin().await?;
        let mut active: album::ActiveModel = current.album.into();
        active.title = Set(fields.title);
        active.description = Set(fields.description);
        active.artist = Set(fields.artist);
        active.price_cents = Set(fields.price_cents);
        active.format = Set(fields.format);
        active.release_date = Set(fields.release_date);
        active.cover_image = Set(fields.cover_image);
        active.updated_at = Set(Utc::now().into());
        let updated = AlbumRepository::new(&txn)
            .update(active)
            .await
            .map_err(duplicate_album_error)?;

        if let Some(tracks) = tracks {
            TracklistRepository::new(&txn)
                .replace_membership(id, tracks)
                .await?;
        }
        txn.commit().await?;

        tracing::info!(album_id = id, replaced_tracks = tracks.is_some(), "Album updated");

        let rows = TracklistRepository::new(self.db).for_album(id).await?;
        Ok(AlbumDetail::from_rows(updated, rows))
    }

    /// Remove an album and its tracklist items. Songs are left in place.
    pub async fn delete_album(&self, actor: Option<&Actor>, id: i32) -> Result<()> {
        let album = self.authorize_delete(actor, id).await?;

        let txn = self.db.begin().await?;
        let removed = TracklistRepository::new(&txn).clear(id).await?;
        AlbumRepository::new(&txn).delete(album).await?;
        txn.commit().await?;

        tracing::info!(album_id = id, removed_tracks = removed, "Album deleted");
        Ok(())
    }

    async fn find_album(&self, id: i32) -> Result<album::Model> {
        AlbumRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))
    }

    /// Field rules, the (title, artist, format) uniqueness rule, and track references.
    async fn validate_album(
        &self,
        form: &AlbumForm,
        tracks: Option<&[TrackSelection]>,
        editing: Option<i32>,
    ) -> Result<AlbumFields> {
        let today = Utc::now().date_naive();
        let (fields, mut errors) = match form.validate(today) {
            Ok(fields) => (Some(fields), FieldErrors::new()),
            Err(errors) => (None, errors),
        };

        if let Some(fields) = &fields {
            let duplicate = AlbumRepository::new(self.db)
                .find_by_natural_key(&fields.title, &fields.artist, fields.format)
                .await?;
            if duplicate.is_some_and(|d| Some(d.id) != editing) {
                errors.add(NON_FIELD_ERRORS, DUPLICATE_ALBUM);
            }
        }

        if let Some(tracks) = tracks {
            check_track_selection(tracks, &mut errors);
            let ids: Vec<i32> = tracks.iter().map(|t| t.song_id).collect();
            let found = SongRepository::new(self.db).find_many(&ids).await?;
            for id in ids.iter().filter(|id| !found.iter().any(|s| s.id == **id)) {
                errors.add(
                    "tracks",
                    format!("Select a valid choice. {} is not one of the available choices.", id),
                );
            }
        }

        match fields {
            Some(fields) if errors.is_empty() => Ok(fields),
            _ => Err(AppError::Validation(errors)),
        }
    }
}
