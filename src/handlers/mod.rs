pub mod albums;
pub mod auth;
pub mod flash;
pub mod health;
pub mod html;
pub mod params;
pub mod principal;
pub mod songs;
pub mod tracklist;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth endpoints
        .route("/auth/login", post(auth::api_login))
        .route("/auth/logout", post(auth::api_logout))
        .route("/me", get(auth::me))

        // Album endpoints
        .route("/albums", get(albums::list_albums).post(albums::create_album))
        .route(
            "/albums/:id",
            get(albums::get_album)
                .put(albums::update_album)
                .delete(albums::delete_album),
        )

        // Song endpoints
        .route("/songs", get(songs::list_songs).post(songs::create_song))
        .route(
            "/songs/:id",
            get(songs::get_song)
                .put(songs::update_song)
                .delete(songs::delete_song),
        )

        // Tracklist endpoints
        .route("/tracklist", get(tracklist::list_items).post(tracklist::create_item))
        .route(
            "/tracklist/:id",
            get(tracklist::get_item)
                .put(tracklist::update_item)
                .delete(tracklist::delete_item),
        )
}

pub fn html_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(html::index))
        .route("/albums/new", get(html::new_album_form).post(html::new_album_submit))
        .route("/albums/:id", get(html::album_detail))
        .route("/albums/:id/edit", get(html::edit_album_form).post(html::edit_album_submit))
        .route(
            "/albums/:id/delete",
            get(html::delete_album_confirm).post(html::delete_album_submit),
        )
        .route("/albums/:id/:slug", get(html::album_detail_slug))
        .route("/accounts/login", get(auth::login_form).post(auth::login_submit))
        .route("/accounts/logout", post(auth::logout_submit))
}
