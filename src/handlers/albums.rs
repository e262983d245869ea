use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    db::{entities::song, enums::AlbumFormat},
    error::Result,
    services::{
        validation::{format_price, short_description, AlbumForm, TrackSelection},
        AlbumDetail, CatalogService,
    },
    state::AppState,
};

use super::params::RecordId;
use super::principal::CurrentUser;

#[derive(Debug, Serialize)]
pub struct AlbumResponse {
    pub id: i32,
    pub cover_image: String,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub artist: String,
    pub price: String,
    pub format: AlbumFormat,
    pub release_date: NaiveDate,
    pub release_year: i32,
    pub slug: String,
    pub tracks: Vec<SongResponse>,
    /// Seconds.
    pub total_playtime: i64,
}

#[derive(Debug, Serialize)]
pub struct SongResponse {
    pub id: i32,
    pub title: String,
    pub length: i32,
}

impl From<&song::Model> for SongResponse {
    fn from(song: &song::Model) -> Self {
        Self {
            id: song.id,
            title: song.title.clone(),
            length: song.length,
        }
    }
}

impl From<AlbumDetail> for AlbumResponse {
    fn from(detail: AlbumDetail) -> Self {
        let total_playtime = detail.total_playtime();
        let tracks = detail.songs().map(SongResponse::from).collect();
        let album = detail.album;
        Self {
            id: album.id,
            cover_image: album.cover_image,
            short_description: short_description(&album.description),
            description: album.description,
            title: album.title,
            artist: album.artist,
            price: format_price(album.price_cents),
            format: album.format,
            release_year: album.release_date.year(),
            release_date: album.release_date,
            slug: album.slug,
            tracks,
            total_playtime,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    #[serde(flatten)]
    pub album: AlbumForm,
    #[serde(default)]
    pub tracks: Vec<TrackSelection>,
}

/// Leaving `tracks` out keeps the album's current tracklist.
#[derive(Debug, Deserialize)]
pub struct UpdateAlbumRequest {
    #[serde(flatten)]
    pub album: AlbumForm,
    #[serde(default)]
    pub tracks: Option<Vec<TrackSelection>>,
}

pub async fn list_albums(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<AlbumResponse>>> {
    let actor = user.actor(&state).await?;
    let albums = CatalogService::new(&state.db)
        .list_albums(actor.as_ref())
        .await?;
    Ok(Json(albums.into_iter().map(AlbumResponse::from).collect()))
}

pub async fn get_album(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<Json<AlbumResponse>> {
    user.actor(&state).await?;
    let detail = CatalogService::new(&state.db).get_album(id, None).await?;
    Ok(Json(detail.into()))
}

pub async fn create_album(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<AlbumResponse>)> {
    let actor = user.actor(&state).await?;
    let catalog = CatalogService::new(&state.db);
    let created = catalog
        .create_album(actor.as_ref(), &request.album, &request.tracks)
        .await?;
    let detail = catalog.get_album(created.id, None).await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

pub async fn update_album(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
    Json(request): Json<UpdateAlbumRequest>,
) -> Result<Json<AlbumResponse>> {
    let actor = user.actor(&state).await?;
    let detail = CatalogService::new(&state.db)
        .edit_album(actor.as_ref(), id, &request.album, request.tracks.as_deref())
        .await?;
    Ok(Json(detail.into()))
}

pub async fn delete_album(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<StatusCode> {
    let actor = user.actor(&state).await?;
    CatalogService::new(&state.db)
        .delete_album(actor.as_ref(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
