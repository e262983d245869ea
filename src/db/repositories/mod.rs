use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::entities::{album, album_tracklist_item, music_manager_user, session, song, user};
use crate::db::enums::AlbumFormat;
use crate::error::Result;
use crate::services::validation::TrackSelection;

/// Natural tracklist order: positioned items ascending, unpositioned last, then by id.
pub fn sort_tracklist(items: &mut [(album_tracklist_item::Model, song::Model)]) {
    items.sort_by_key(|(item, _)| (item.position.is_none(), item.position, item.id));
}

pub struct AlbumRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AlbumRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<album::Model>> {
        Ok(album::Entity::find_by_id(id).one(self.db).await?)
    }

    pub async fn find_by_id_and_slug(&self, id: i32, slug: &str) -> Result<Option<album::Model>> {
        Ok(album::Entity::find_by_id(id)
            .filter(album::Column::Slug.eq(slug))
            .one(self.db)
            .await?)
    }

    /// All albums in storage order, optionally restricted to one artist.
    pub async fn list(&self, artist: Option<&str>) -> Result<Vec<album::Model>> {
        let mut select = album::Entity::find();
        if let Some(artist) = artist {
            select = select.filter(album::Column::Artist.eq(artist));
        }
        Ok(select.order_by_asc(album::Column::Id).all(self.db).await?)
    }

    pub async fn find_by_natural_key(
        &self,
        title: &str,
        artist: &str,
        format: AlbumFormat,
    ) -> Result<Option<album::Model>> {
        Ok(album::Entity::find()
            .filter(album::Column::Title.eq(title))
            .filter(album::Column::Artist.eq(artist))
            .filter(album::Column::Format.eq(format))
            .one(self.db)
            .await?)
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Vec<album::Model>> {
        Ok(album::Entity::find()
            .filter(album::Column::Title.eq(title))
            .order_by_asc(album::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn create(&self, album: album::ActiveModel) -> Result<album::Model> {
        Ok(album.insert(self.db).await?)
    }

    pub async fn update(&self, album: album::ActiveModel) -> Result<album::Model> {
        Ok(album.update(self.db).await?)
    }

    pub async fn delete(&self, album: album::Model) -> Result<()> {
        album.delete(self.db).await?;
        Ok(())
    }
}

pub struct SongRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SongRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<song::Model>> {
        Ok(song::Entity::find_by_id(id).one(self.db).await?)
    }

    pub async fn find_many(&self, ids: &[i32]) -> Result<Vec<song::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(song::Entity::find()
            .filter(song::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await?)
    }

    pub async fn list(&self) -> Result<Vec<song::Model>> {
        Ok(song::Entity::find()
            .order_by_asc(song::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn find_by_title_and_length(&self, title: &str, length: i32) -> Result<Option<song::Model>> {
        Ok(song::Entity::find()
            .filter(song::Column::Title.eq(title))
            .filter(song::Column::Length.eq(length))
            .one(self.db)
            .await?)
    }

    pub async fn create(&self, song: song::ActiveModel) -> Result<song::Model> {
        Ok(song.insert(self.db).await?)
    }

    pub async fn update(&self, song: song::ActiveModel) -> Result<song::Model> {
        Ok(song.update(self.db).await?)
    }

    pub async fn delete(&self, song: song::Model) -> Result<()> {
        song.delete(self.db).await?;
        Ok(())
    }
}

pub struct TracklistRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TracklistRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<album_tracklist_item::Model>> {
        Ok(album_tracklist_item::Entity::find_by_id(id).one(self.db).await?)
    }

    pub async fn find_pair(
        &self,
        album_id: i32,
        song_id: i32,
    ) -> Result<Option<album_tracklist_item::Model>> {
        Ok(album_tracklist_item::Entity::find()
            .filter(album_tracklist_item::Column::AlbumId.eq(album_id))
            .filter(album_tracklist_item::Column::SongId.eq(song_id))
            .one(self.db)
            .await?)
    }

    pub async fn list(&self) -> Result<Vec<album_tracklist_item::Model>> {
        Ok(album_tracklist_item::Entity::find()
            .order_by_asc(album_tracklist_item::Column::Id)
            .all(self.db)
            .await?)
    }

    /// Items of one album joined with their songs, in natural tracklist order.
    pub async fn for_album(
        &self,
        album_id: i32,
    ) -> Result<Vec<(album_tracklist_item::Model, song::Model)>> {
        let mut items = self.for_albums(&[album_id]).await?;
        sort_tracklist(&mut items);
        Ok(items)
    }

    /// Items of several albums joined with their songs, unordered.
    pub async fn for_albums(
        &self,
        album_ids: &[i32],
    ) -> Result<Vec<(album_tracklist_item::Model, song::Model)>> {
        if album_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = album_tracklist_item::Entity::find()
            .filter(album_tracklist_item::Column::AlbumId.is_in(album_ids.iter().copied()))
            .find_also_related(song::Entity)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(item, song)| song.map(|s| (item, s)))
            .collect())
    }

    pub async fn create(
        &self,
        item: album_tracklist_item::ActiveModel,
    ) -> Result<album_tracklist_item::Model> {
        Ok(item.insert(self.db).await?)
    }

    pub async fn update(
        &self,
        item: album_tracklist_item::ActiveModel,
    ) -> Result<album_tracklist_item::Model> {
        Ok(item.update(self.db).await?)
    }

    pub async fn delete(&self, item: album_tracklist_item::Model) -> Result<()> {
        item.delete(self.db).await?;
        Ok(())
    }

    pub async fn clear(&self, album_id: i32) -> Result<u64> {
        let result = album_tracklist_item::Entity::delete_many()
            .filter(album_tracklist_item::Column::AlbumId.eq(album_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn clear_song(&self, song_id: i32) -> Result<u64> {
        let result = album_tracklist_item::Entity::delete_many()
            .filter(album_tracklist_item::Column::SongId.eq(song_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Replace an album's song membership: every existing item is removed, then
    /// one item per selection is inserted. Not atomic unless `C` is a transaction.
    pub async fn replace_membership(
        &self,
        album_id: i32,
        tracks: &[TrackSelection],
    ) -> Result<Vec<album_tracklist_item::Model>> {
        self.clear(album_id).await?;

        let mut created = Vec::with_capacity(tracks.len());
        for track in tracks {
            let item = album_tracklist_item::ActiveModel {
                album_id: Set(album_id),
                song_id: Set(track.song_id),
                position: Set(track.position),
                ..Default::default()
            };
            created.push(item.insert(self.db).await?);
        }
        Ok(created)
    }
}

pub struct UserRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(self.db).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db)
            .await?)
    }

    pub async fn create(&self, user: user::ActiveModel) -> Result<user::Model> {
        Ok(user.insert(self.db).await?)
    }

    pub async fn find_profile(&self, user_id: i32) -> Result<Option<music_manager_user::Model>> {
        Ok(music_manager_user::Entity::find()
            .filter(music_manager_user::Column::UserId.eq(user_id))
            .one(self.db)
            .await?)
    }

    pub async fn create_profile(
        &self,
        profile: music_manager_user::ActiveModel,
    ) -> Result<music_manager_user::Model> {
        Ok(profile.insert(self.db).await?)
    }
}

pub struct SessionRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SessionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, session: session::ActiveModel) -> Result<session::Model> {
        Ok(session.insert(self.db).await?)
    }

    /// Session with this token hash that has not yet expired at `now`.
    pub async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<Option<session::Model>> {
        let session = session::Entity::find()
            .filter(session::Column::TokenHash.eq(token_hash))
            .one(self.db)
            .await?;
        Ok(session.filter(|s| s.expires_at > now))
    }

    pub async fn delete_by_token_hash(&self, token_hash: &str) -> Result<u64> {
        let result = session::Entity::delete_many()
            .filter(session::Column::TokenHash.eq(token_hash))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn purge_expired(&self, now: DateTime<FixedOffset>) -> Result<u64> {
        let result = session::Entity::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
