use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::Result,
    services::{validation::SongForm, SongService},
    state::AppState,
};

use super::albums::SongResponse;
use super::params::RecordId;
use super::principal::CurrentUser;

pub async fn list_songs(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<SongResponse>>> {
    user.actor(&state).await?;
    let songs = SongService::new(&state.db).list_songs().await?;
    Ok(Json(songs.iter().map(SongResponse::from).collect()))
}

pub async fn get_song(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<Json<SongResponse>> {
    user.actor(&state).await?;
    let song = SongService::new(&state.db).get_song(id).await?;
    Ok(Json(SongResponse::from(&song)))
}

pub async fn create_song(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<SongForm>,
) -> Result<(StatusCode, Json<SongResponse>)> {
    let actor = user.actor(&state).await?;
    let song = SongService::new(&state.db)
        .create_song(actor.as_ref(), &form)
        .await?;
    Ok((StatusCode::CREATED, Json(SongResponse::from(&song))))
}

pub async fn update_song(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
    Json(form): Json<SongForm>,
) -> Result<Json<SongResponse>> {
    let actor = user.actor(&state).await?;
    let song = SongService::new(&state.db)
        .update_song(actor.as_ref(), id, &form)
        .await?;
    Ok(Json(SongResponse::from(&song)))
}

pub async fn delete_song(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<StatusCode> {
    let actor = user.actor(&state).await?;
    SongService::new(&state.db)
        .delete_song(actor.as_ref(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
