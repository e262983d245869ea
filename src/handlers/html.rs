//! Server-rendered pages.
//!
//! Handlers build their page through an inner `Result`; failures are turned
//! into HTML here, with login-required becoming a redirect to the login form.

use axum::{
    extract::{OriginalUri, Path, State},
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use maud::Markup;

use crate::{
    error::{AppError, FieldErrors, Result},
    permissions::{self, Actor, Operation},
    services::{
        validation::{AlbumForm, TrackSelection},
        AlbumDetail, CatalogService, SongService,
    },
    state::AppState,
    templates::{
        album_delete_page, album_detail_page, album_form_page, album_list_page, error_page,
        AlbumFormView,
    },
};

use super::flash::{redirect_with_flash, Flash};
use super::params::{parse_record_id, RecordId};
use super::principal::CurrentUser;

type IdParam = std::result::Result<RecordId, AppError>;

fn page(markup: Markup) -> Response {
    Html(markup.into_string()).into_response()
}

fn render(uri: &Uri, result: Result<Response>) -> Response {
    match result {
        Ok(response) => response,
        Err(AppError::LoginRequired) => {
            Redirect::to(&format!("/accounts/login?next={}", uri.path())).into_response()
        }
        Err(e) => {
            let status = e.status();
            let message = match &e {
                AppError::NotFound(msg) | AppError::PermissionDenied(msg) => msg.clone(),
                _ => {
                    tracing::error!(error = %e, path = uri.path(), "Page failed");
                    "Something went wrong on our side.".to_string()
                }
            };
            (status, Html(error_page(status, &message).into_string())).into_response()
        }
    }
}

/// Album fields plus the `tracks` checkboxes and their `position_<song id>` inputs.
pub fn parse_album_form(pairs: &[(String, String)]) -> (AlbumForm, Vec<TrackSelection>, FieldErrors) {
    let mut form = AlbumForm::default();
    let mut song_ids = Vec::new();
    let mut errors = FieldErrors::new();

    for (name, value) in pairs {
        match name.as_str() {
            "title" => form.title = value.clone(),
            "description" => form.description = value.clone(),
            "artist" => form.artist = value.clone(),
            "price" => form.price = value.clone(),
            "format" => form.format = value.clone(),
            "release_date" => form.release_date = value.clone(),
            "cover_image" => form.cover_image = value.clone(),
            "tracks" => match value.trim().parse::<i32>() {
                Ok(id) => song_ids.push(id),
                Err(_) => errors.add(
                    "tracks",
                    format!("Select a valid choice. {} is not one of the available choices.", value),
                ),
            },
            _ => {}
        }
    }

    let tracks = song_ids
        .into_iter()
        .map(|song_id| {
            let key = format!("position_{}", song_id);
            let raw = pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.trim())
                .unwrap_or("");
            let position = if raw.is_empty() {
                None
            } else {
                match raw.parse::<i32>() {
                    Ok(p) => Some(p),
                    Err(_) => {
                        errors.add("tracks", format!("Position for song {} must be a whole number.", song_id));
                        None
                    }
                }
            };
            TrackSelection { song_id, position }
        })
        .collect();

    (form, tracks, errors)
}

fn selections(detail: &AlbumDetail) -> Vec<TrackSelection> {
    detail
        .tracks
        .iter()
        .map(|t| TrackSelection {
            song_id: t.song.id,
            position: t.item.position,
        })
        .collect()
}

async fn form_page(
    state: &AppState,
    actor: Option<&Actor>,
    heading: &str,
    action: String,
    form: &AlbumForm,
    selected: &[TrackSelection],
    errors: &FieldErrors,
) -> Result<Response> {
    let songs = SongService::new(&state.db).list_songs().await?;
    let view = AlbumFormView {
        heading,
        action,
        form,
        songs: &songs,
        selected,
        errors,
    };
    Ok(page(album_form_page(actor, &view)))
}

async fn list_page(state: &AppState, user: &CurrentUser, flash: &Flash) -> Result<Response> {
    let actor = user.actor(state).await?;
    let albums = CatalogService::new(&state.db)
        .list_albums(actor.as_ref())
        .await?;
    let response = page(album_list_page(actor.as_ref(), &albums, flash.message()));
    Ok(flash.consume(response))
}

pub async fn index(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    user: CurrentUser,
    flash: Flash,
) -> Response {
    render(&uri, list_page(&state, &user, &flash).await)
}

async fn detail_page(
    state: &AppState,
    user: &CurrentUser,
    flash: &Flash,
    id: i32,
    slug: Option<&str>,
) -> Result<Response> {
    let actor = user.actor(state).await?;
    let detail = CatalogService::new(&state.db).get_album(id, slug).await?;
    let artist = Some(detail.album.artist.as_str());
    let can_edit = permissions::authorize(actor.as_ref(), Operation::EditAlbum, artist).is_allowed();
    let can_delete =
        permissions::authorize(actor.as_ref(), Operation::DeleteAlbum, artist).is_allowed();
    let markup = album_detail_page(actor.as_ref(), &detail, can_edit, can_delete, flash.message());
    Ok(flash.consume(page(markup)))
}

pub async fn album_detail(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    user: CurrentUser,
    flash: Flash,
    id: IdParam,
) -> Response {
    let result = match id {
        Ok(RecordId(id)) => detail_page(&state, &user, &flash, id, None).await,
        Err(e) => Err(e),
    };
    render(&uri, result)
}

pub async fn album_detail_slug(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    user: CurrentUser,
    flash: Flash,
    Path((raw_id, slug)): Path<(String, String)>,
) -> Response {
    let result = match parse_record_id(&raw_id) {
        Ok(id) => detail_page(&state, &user, &flash, id, Some(&slug)).await,
        Err(e) => Err(e),
    };
    render(&uri, result)
}

async fn create_form(state: &AppState, user: &CurrentUser) -> Result<Response> {
    let actor = user.actor(state).await?;
    CatalogService::new(&state.db).authorize_create(actor.as_ref())?;
    form_page(
        state,
        actor.as_ref(),
        "New album",
        "/albums/new".to_string(),
        &AlbumForm::default(),
        &[],
        &FieldErrors::new(),
    )
    .await
}

pub async fn new_album_form(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    user: CurrentUser,
) -> Response {
    render(&uri, create_form(&state, &user).await)
}

/// A validation failure re-renders the form with the submitted values.
async fn create_submit(
    state: &AppState,
    user: &CurrentUser,
    pairs: &[(String, String)],
) -> Result<Response> {
    let actor = user.actor(state).await?;
    let catalog = CatalogService::new(&state.db);
    catalog.authorize_create(actor.as_ref())?;

    let (form, tracks, parse_errors) = parse_album_form(pairs);
    let outcome = if parse_errors.is_empty() {
        catalog
            .create_album(actor.as_ref(), &form, &tracks)
            .await
            .map(|_| ())
    } else {
        Err(AppError::Validation(parse_errors))
    };

    match outcome {
        Ok(()) => Ok(redirect_with_flash("/", "Album created successfully.")),
        Err(AppError::Validation(errors)) => {
            form_page(
                state,
                actor.as_ref(),
                "New album",
                "/albums/new".to_string(),
                &form,
                &tracks,
                &errors,
            )
            .await
        }
        Err(e) => Err(e),
    }
}

pub async fn new_album_submit(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    user: CurrentUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    render(&uri, create_submit(&state, &user, &pairs).await)
}

async fn edit_form(state: &AppState, user: &CurrentUser, id: i32) -> Result<Response> {
    let actor = user.actor(state).await?;
    let detail = CatalogService::new(&state.db)
        .authorize_edit(actor.as_ref(), id)
        .await?;
    form_page(
        state,
        actor.as_ref(),
        "Edit album",
        format!("/albums/{}/edit", id),
        &AlbumForm::from_model(&detail.album),
        &selections(&detail),
        &FieldErrors::new(),
    )
    .await
}

pub async fn edit_album_form(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    user: CurrentUser,
    id: IdParam,
) -> Response {
    let result = match id {
        Ok(RecordId(id)) => edit_form(&state, &user, id).await,
        Err(e) => Err(e),
    };
    render(&uri, result)
}

/// The submitted selection replaces the album's whole tracklist.
async fn edit_submit(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
    pairs: &[(String, String)],
) -> Result<Response> {
    let actor = user.actor(state).await?;
    let catalog = CatalogService::new(&state.db);
    catalog.authorize_edit(actor.as_ref(), id).await?;

    let (form, tracks, parse_errors) = parse_album_form(pairs);
    let outcome = if parse_errors.is_empty() {
        catalog
            .edit_album(actor.as_ref(), id, &form, Some(&tracks))
            .await
            .map(|_| ())
    } else {
        Err(AppError::Validation(parse_errors))
    };

    match outcome {
        Ok(()) => Ok(redirect_with_flash(
            &format!("/albums/{}", id),
            "Album updated successfully.",
        )),
        Err(AppError::Validation(errors)) => {
            form_page(
                state,
                actor.as_ref(),
                "Edit album",
                format!("/albums/{}/edit", id),
                &form,
                &tracks,
                &errors,
            )
            .await
        }
        Err(e) => Err(e),
    }
}

pub async fn edit_album_submit(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    user: CurrentUser,
    id: IdParam,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let result = match id {
        Ok(RecordId(id)) => edit_submit(&state, &user, id, &pairs).await,
        Err(e) => Err(e),
    };
    render(&uri, result)
}

async fn delete_confirm(state: &AppState, user: &CurrentUser, id: i32) -> Result<Response> {
    let actor = user.actor(state).await?;
    let album = CatalogService::new(&state.db)
        .authorize_delete(actor.as_ref(), id)
        .await?;
    Ok(page(album_delete_page(actor.as_ref(), &album)))
}

pub async fn delete_album_confirm(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    user: CurrentUser,
    id: IdParam,
) -> Response {
    let result = match id {
        Ok(RecordId(id)) => delete_confirm(&state, &user, id).await,
        Err(e) => Err(e),
    };
    render(&uri, result)
}

async fn delete_submit(state: &AppState, user: &CurrentUser, id: i32) -> Result<Response> {
    let actor = user.actor(state).await?;
    CatalogService::new(&state.db)
        .delete_album(actor.as_ref(), id)
        .await?;
    Ok(redirect_with_flash("/", "Album deleted successfully"))
}

pub async fn delete_album_submit(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    user: CurrentUser,
    id: IdParam,
) -> Response {
    let result = match id {
        Ok(RecordId(id)) => delete_submit(&state, &user, id).await,
        Err(e) => Err(e),
    };
    render(&uri, result)
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    render(&uri, Err(AppError::NotFound("Page not found".to_string())))
}
