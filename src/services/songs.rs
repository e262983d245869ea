use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

use crate::db::entities::{album_tracklist_item, song};
use crate::db::repositories::{AlbumRepository, SongRepository, TracklistRepository};
use crate::error::{AppError, FieldErrors, Result, NON_FIELD_ERRORS};
use crate::permissions::{Actor, Operation};
use crate::services::catalog::{ensure, require_login};
use crate::services::validation::{SongForm, TracklistItemForm};

pub struct SongService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SongService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_songs(&self) -> Result<Vec<song::Model>> {
        SongRepository::new(self.db).list().await
    }

    pub async fn get_song(&self, id: i32) -> Result<song::Model> {
        SongRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Song not found".to_string()))
    }

    pub async fn create_song(&self, actor: Option<&Actor>, form: &SongForm) -> Result<song::Model> {
        ensure(require_login(actor)?, Operation::ManageSongs, None)?;
        let fields = form.validate().map_err(AppError::Validation)?;

        let created = SongRepository::new(self.db)
            .create(song::ActiveModel {
                title: Set(fields.title),
                length: Set(fields.length),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await?;

        tracing::info!(song_id = created.id, "Song created");
        Ok(created)
    }

    pub async fn update_song(
        &self,
        actor: Option<&Actor>,
        id: i32,
        form: &SongForm,
    ) -> Result<song::Model> {
        ensure(require_login(actor)?, Operation::ManageSongs, None)?;
        let existing = self.get_song(id).await?;
        let fields = form.validate().map_err(AppError::Validation)?;

        let mut active: song::ActiveModel = existing.into();
        active.title = Set(fields.title);
        active.length = Set(fields.length);
        let updated = SongRepository::new(self.db).update(active).await?;

        tracing::info!(song_id = id, "Song updated");
        Ok(updated)
    }

    /// Delete a song along with every tracklist item that references it.
    pub async fn delete_song(&self, actor: Option<&Actor>, id: i32) -> Result<()> {
        ensure(require_login(actor)?, Operation::ManageSongs, None)?;
        let existing = self.get_song(id).await?;

        let txn = self.db.begin().await?;
        let unlinked = TracklistRepository::new(&txn).clear_song(id).await?;
        SongRepository::new(&txn).delete(existing).await?;
        txn.commit().await?;

        tracing::info!(song_id = id, unlinked, "Song deleted");
        Ok(())
    }
}

/// Direct access to album/song links. Writes count as edits of the owning album.
pub struct TracklistService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TracklistService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_items(&self) -> Result<Vec<album_tracklist_item::Model>> {
        TracklistRepository::new(self.db).list().await
    }

    pub async fn get_item(&self, id: i32) -> Result<album_tracklist_item::Model> {
        TracklistRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tracklist item not found".to_string()))
    }

    pub async fn create_item(
        &self,
        actor: Option<&Actor>,
        form: &TracklistItemForm,
    ) -> Result<album_tracklist_item::Model> {
        let actor = require_login(actor)?;
        self.authorize_album(actor, form.album).await?;
        self.validate_item(form, None).await?;

        let created = TracklistRepository::new(self.db)
            .create(album_tracklist_item::ActiveModel {
                album_id: Set(form.album),
                song_id: Set(form.song),
                position: Set(form.position),
                ..Default::default()
            })
            .await?;

        tracing::info!(item_id = created.id, album_id = form.album, song_id = form.song, "Tracklist item created");
        Ok(created)
    }

    pub async fn update_item(
        &self,
        actor: Option<&Actor>,
        id: i32,
        form: &TracklistItemForm,
    ) -> Result<album_tracklist_item::Model> {
        let actor = require_login(actor)?;
        let existing = self.get_item(id).await?;
        self.authorize_album(actor, existing.album_id).await?;
        if form.album != existing.album_id {
            self.authorize_album(actor, form.album).await?;
        }
        self.validate_item(form, Some(id)).await?;

        let mut active: album_tracklist_item::ActiveModel = existing.into();
        active.album_id = Set(form.album);
        active.song_id = Set(form.song);
        active.position = Set(form.position);
        let updated = TracklistRepository::new(self.db).update(active).await?;

        tracing::info!(item_id = id, "Tracklist item updated");
        Ok(updated)
    }

    pub async fn delete_item(&self, actor: Option<&Actor>, id: i32) -> Result<()> {
        let actor = require_login(actor)?;
        let existing = self.get_item(id).await?;
        self.authorize_album(actor, existing.album_id).await?;

        TracklistRepository::new(self.db).delete(existing).await?;
        tracing::info!(item_id = id, "Tracklist item deleted");
        Ok(())
    }

    /// Edit rights on the album an item belongs to. A missing album is a field error.
    async fn authorize_album(&self, actor: &Actor, album_id: i32) -> Result<()> {
        let album = AlbumRepository::new(self.db)
            .find_by_id(album_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(FieldErrors::single(
                    "album",
                    format!("Invalid pk \"{}\" - object does not exist.", album_id),
                ))
            })?;
        ensure(actor, Operation::EditAlbum, Some(&album.artist))
    }

    async fn validate_item(&self, form: &TracklistItemForm, editing: Option<i32>) -> Result<()> {
        let mut errors = form.validate().err().unwrap_or_default();

        if SongRepository::new(self.db).find_by_id(form.song).await?.is_none() {
            errors.add(
                "song",
                format!("Invalid pk \"{}\" - object does not exist.", form.song),
            );
        }

        let existing = TracklistRepository::new(self.db)
            .find_pair(form.album, form.song)
            .await?;
        if existing.is_some_and(|item| Some(item.id) != editing) {
            errors.add(NON_FIELD_ERRORS, "The fields album, song must make a unique set.");
        }

        errors.into_result()
    }
}
