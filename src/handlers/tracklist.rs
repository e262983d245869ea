use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    db::entities::album_tracklist_item,
    error::Result,
    services::{validation::TracklistItemForm, TracklistService},
    state::AppState,
};

use super::params::RecordId;
use super::principal::CurrentUser;

#[derive(Debug, Serialize)]
pub struct TracklistItemResponse {
    pub id: i32,
    pub album: i32,
    pub song: i32,
    pub position: Option<i32>,
}

impl From<album_tracklist_item::Model> for TracklistItemResponse {
    fn from(item: album_tracklist_item::Model) -> Self {
        Self {
            id: item.id,
            album: item.album_id,
            song: item.song_id,
            position: item.position,
        }
    }
}

pub async fn list_items(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<TracklistItemResponse>>> {
    user.actor(&state).await?;
    let items = TracklistService::new(&state.db).list_items().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

pub async fn get_item(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<Json<TracklistItemResponse>> {
    user.actor(&state).await?;
    let item = TracklistService::new(&state.db).get_item(id).await?;
    Ok(Json(item.into()))
}

pub async fn create_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<TracklistItemForm>,
) -> Result<(StatusCode, Json<TracklistItemResponse>)> {
    let actor = user.actor(&state).await?;
    let item = TracklistService::new(&state.db)
        .create_item(actor.as_ref(), &form)
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

pub async fn update_item(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
    Json(form): Json<TracklistItemForm>,
) -> Result<Json<TracklistItemResponse>> {
    let actor = user.actor(&state).await?;
    let item = TracklistService::new(&state.db)
        .update_item(actor.as_ref(), id, &form)
        .await?;
    Ok(Json(item.into()))
}

pub async fn delete_item(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<StatusCode> {
    let actor = user.actor(&state).await?;
    TracklistService::new(&state.db)
        .delete_item(actor.as_ref(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
