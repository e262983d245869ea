//! Integration tests for the server-rendered pages
//!
//! Covers login redirects, form re-rendering on validation failure, the
//! redirects after successful writes, and the session cookie flow.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sea_orm::EntityTrait;
use tower::util::ServiceExt;

use label_music_manager::create_router;
use label_music_manager::db::entities::{album, album_tracklist_item};
use label_music_manager::db::enums::Role;
use label_music_manager::state::AppState;
use label_music_manager::test_utils::*;

fn create_test_router(state: &AppState) -> Router {
    create_router(state.clone())
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session={}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, token: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session={}", token));
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

/// First detail link on a page, skipping `/albums/new`.
fn first_album_href(html: &str) -> String {
    html.match_indices("href=\"/albums/")
        .map(|(i, _)| &html[i + "href=\"".len()..])
        .map(|rest| rest[..rest.find('"').unwrap()].to_string())
        .find(|href| href["/albums/".len()..].starts_with(|c: char| c.is_ascii_digit()))
        .unwrap()
}

fn set_cookie_values(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

async fn session_for(state: &AppState, username: &str, display_name: &str, role: Role) -> String {
    let (user, _) = create_test_user(&state.db, username, display_name, role).await;
    create_test_session(&state.db, user.id).await
}

#[tokio::test]
async fn test_index_lists_albums_for_anonymous() {
    let state = setup_test_app_state().await;
    create_test_album(&state.db, "Moanin'", "Art Blakey").await;

    let response = create_test_router(&state).oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Art Blakey"));
    assert!(html.contains("Log in"));
}

#[tokio::test]
async fn test_index_greets_signed_in_user() {
    let state = setup_test_app_state().await;
    let token = session_for(&state, "nina", "Nina Simone", Role::Viewer).await;

    let response = create_test_router(&state)
        .oneshot(get("/", Some(&token)))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("Welcome, Nina Simone"));
}

#[tokio::test]
async fn test_detail_by_slug() {
    let state = setup_test_app_state().await;
    let album = create_test_album(&state.db, "Mingus Ah Um", "Charles Mingus").await;
    let app = create_test_router(&state);

    let response = app
        .clone()
        .oneshot(get(&format!("/albums/{}/mingus-ah-um", album.id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/albums/{}/wrong-slug", album.id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_form_redirects_anonymous_to_login() {
    let state = setup_test_app_state().await;

    let response = create_test_router(&state)
        .oneshot(get("/albums/new", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login?next=/albums/new");
}

#[tokio::test]
async fn test_editor_create_redirects_to_list() {
    let state = setup_test_app_state().await;
    let song = create_test_song(&state.db, "Take Five", 324).await;
    let token = session_for(&state, "editor", "Editor", Role::Editor).await;

    let form = format!(
        "title=Time+Out&description=&artist=Dave+Brubeck&price=19.99&format=VL\
         &release_date=1959-12-14&cover_image=&tracks={id}&position_{id}=1",
        id = song.id
    );
    let response = create_test_router(&state)
        .oneshot(post_form("/albums/new", Some(&token), &form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let albums = album::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].title, "Time Out");
    assert_eq!(albums[0].cover_image, "no_cover.jpg");
    let items = album_tracklist_item::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].position, Some(1));
}

#[tokio::test]
async fn test_create_with_empty_title_rerenders_form() {
    let state = setup_test_app_state().await;
    let token = session_for(&state, "editor", "Editor", Role::Editor).await;

    let form = "title=&artist=Someone&price=5&format=CD&release_date=2020-01-01";
    let response = create_test_router(&state)
        .oneshot(post_form("/albums/new", Some(&token), form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains("value=\"Someone\""));
    assert!(album::Entity::find().all(&state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_artist_cannot_open_other_edit_form() {
    let state = setup_test_app_state().await;
    let other = create_test_album(&state.db, "Album B", "Other").await;
    let token = session_for(&state, "artist", "Artist", Role::Artist).await;

    let response = create_test_router(&state)
        .oneshot(get(&format!("/albums/{}/edit", other.id), Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let html = body_text(response).await;
    assert!(html.contains("You do not have permission to edit this album."));
}

#[tokio::test]
async fn test_edit_submit_replaces_tracks_and_redirects() {
    let state = setup_test_app_state().await;
    let album = create_test_album(&state.db, "Album A", "Artist").await;
    let song1 = create_test_song(&state.db, "Song One", 100).await;
    let song2 = create_test_song(&state.db, "Song Two", 100).await;
    create_test_tracklist_item(&state.db, album.id, song1.id, Some(1)).await;
    let token = session_for(&state, "artist", "Artist", Role::Artist).await;

    let form = format!(
        "title=Album+A&artist=Artist&price=9.99&format=CD&release_date=2020-01-01\
         &tracks={id}&position_{id}=1",
        id = song2.id
    );
    let response = create_test_router(&state)
        .oneshot(post_form(&format!("/albums/{}/edit", album.id), Some(&token), &form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/albums/{}", album.id));

    let items = album_tracklist_item::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].song_id, song2.id);
}

#[tokio::test]
async fn test_delete_confirm_and_submit() {
    let state = setup_test_app_state().await;
    let album = create_test_album(&state.db, "Goodbye", "Band").await;
    let token = session_for(&state, "editor", "Editor", Role::Editor).await;
    let app = create_test_router(&state);

    let response = app
        .clone()
        .oneshot(get(&format!("/albums/{}/delete", album.id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Are you sure"));

    let response = app
        .oneshot(post_form(&format!("/albums/{}/delete", album.id), Some(&token), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(album::Entity::find_by_id(album.id).one(&state.db).await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_sets_cookie_and_follows_next() {
    let state = setup_test_app_state().await;
    create_test_user(&state.db, "editor", "Editor", Role::Editor).await;

    let form = format!("username=editor&password={}&next=/albums/new", TEST_PASSWORD);
    let response = create_test_router(&state)
        .oneshot(post_form("/accounts/login", None, &form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/albums/new");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_with_bad_password_rerenders() {
    let state = setup_test_app_state().await;
    create_test_user(&state.db, "editor", "Editor", Role::Editor).await;

    let response = create_test_router(&state)
        .oneshot(post_form("/accounts/login", None, "username=editor&password=nope"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(response)
        .await
        .contains("Please enter a correct username and password."));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let state = setup_test_app_state().await;
    let token = session_for(&state, "viewer", "Viewer", Role::Viewer).await;
    let app = create_test_router(&state);

    let response = app
        .clone()
        .oneshot(post_form("/accounts/logout", Some(&token), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.oneshot(get("/", Some(&token))).await.unwrap();
    assert!(!body_text(response).await.contains("Welcome, Viewer"));
}

#[tokio::test]
async fn test_list_link_for_non_latin_title_reaches_detail() {
    let state = setup_test_app_state().await;
    let album = create_test_album(&state.db, "東京", "Shiina Ringo").await;
    let app = create_test_router(&state);

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    let href = first_album_href(&body_text(response).await);
    assert_eq!(href, format!("/albums/{}", album.id));

    let response = app.oneshot(get(&href, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("東京"));
}

#[tokio::test]
async fn test_accented_title_keeps_its_letters_in_the_slug() {
    let state = setup_test_app_state().await;
    let album = create_test_album(&state.db, "Björk Live", "Björk").await;
    let app = create_test_router(&state);

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    let href = first_album_href(&body_text(response).await);
    assert_eq!(href, format!("/albums/{}/bjork-live", album.id));

    let response = app.oneshot(get(&href, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_link_for_action_named_title_opens_detail() {
    let state = setup_test_app_state().await;
    let token = session_for(&state, "editor", "Editor", Role::Editor).await;
    for title in ["Edit", "Delete"] {
        create_test_album(&state.db, title, "The Verbs").await;
    }
    let app = create_test_router(&state);

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("href=\"/albums/1/edit-album\""));
    assert!(html.contains("href=\"/albums/2/delete-album\""));

    let response = app.clone().oneshot(get("/albums/1/edit-album", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/albums/2/delete-album", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_text(response).await.contains("Are you sure"));
}

#[tokio::test]
async fn test_unparseable_album_id_is_an_html_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    for uri in ["/albums/abc", "/albums/99999999999", "/albums/abc/edit", "/albums/x/some-slug"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert!(body_text(response).await.contains("404"));
    }
}

#[tokio::test]
async fn test_confirmation_shown_once_after_create() {
    let state = setup_test_app_state().await;
    let token = session_for(&state, "editor", "Editor", Role::Editor).await;
    let app = create_test_router(&state);

    let form = "title=Time+Out&artist=Dave+Brubeck&price=19.99&format=VL&release_date=1959-12-14";
    let response = app
        .clone()
        .oneshot(post_form("/albums/new", Some(&token), form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let flash = set_cookie_values(&response)
        .into_iter()
        .find(|c| c.starts_with("flash="))
        .unwrap();
    let flash_pair = flash.split(';').next().unwrap().to_string();

    let request = Request::builder()
        .uri("/")
        .header(header::COOKIE, format!("session={}; {}", token, flash_pair))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie_values(&response)
        .iter()
        .any(|c| c.starts_with("flash=;") && c.contains("Max-Age=0")));
    assert!(body_text(response).await.contains("Album created successfully."));

    let response = app.oneshot(get("/", Some(&token))).await.unwrap();
    assert!(!body_text(response).await.contains("Album created successfully."));
}

#[tokio::test]
async fn test_delete_sets_confirmation_cookie() {
    let state = setup_test_app_state().await;
    let album = create_test_album(&state.db, "Goodbye", "Band").await;
    let token = session_for(&state, "editor", "Editor", Role::Editor).await;

    let response = create_test_router(&state)
        .oneshot(post_form(&format!("/albums/{}/delete", album.id), Some(&token), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(set_cookie_values(&response)
        .iter()
        .any(|c| c.starts_with("flash=") && !c.contains("Max-Age=0")));
}
