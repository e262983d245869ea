use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db::{enums::Role, repositories::UserRepository},
    error::{AppError, Result},
    services::AuthService,
    state::AppState,
    templates::login_page,
};

use super::principal::{clear_session_cookie_header, session_cookie_header, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i32,
    pub user: i32,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

pub async fn api_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (_, session) = AuthService::new(&state.db, state.config.session_ttl_hours)
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
    }))
}

pub async fn api_logout(State(state): State<AppState>, user: CurrentUser) -> Result<StatusCode> {
    let token = match (&user.principal, &user.token) {
        (Some(_), Some(token)) => token,
        _ => return Err(AppError::LoginRequired),
    };
    AuthService::new(&state.db, state.config.session_ttl_hours)
        .logout(token)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(State(state): State<AppState>, user: CurrentUser) -> Result<Json<ProfileResponse>> {
    let principal = user.principal.ok_or(AppError::LoginRequired)?;
    let profile = UserRepository::new(&state.db)
        .find_profile(principal.user_id)
        .await?
        .ok_or(AppError::MissingProfile {
            user_id: principal.user_id,
        })?;

    Ok(Json(ProfileResponse {
        id: profile.id,
        user: principal.user_id,
        username: principal.username,
        display_name: profile.display_name,
        role: profile.role,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after login.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

pub async fn login_form(Query(query): Query<LoginQuery>) -> Html<String> {
    let next = safe_next(query.next.as_deref());
    Html(login_page(next, "", None).into_string())
}

pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginFormData>,
) -> Result<Response> {
    let next = safe_next(form.next.as_deref()).to_string();
    let auth = AuthService::new(&state.db, state.config.session_ttl_hours);

    match auth.login(&form.username, &form.password).await {
        Ok((_, session)) => {
            let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);
            Ok((
                [(header::SET_COOKIE, session_cookie_header(&session.token, max_age))],
                Redirect::to(&next),
            )
                .into_response())
        }
        Err(AppError::Authentication(_)) => {
            let page = login_page(
                &next,
                &form.username,
                Some("Please enter a correct username and password."),
            );
            Ok(Html(page.into_string()).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn logout_submit(State(state): State<AppState>, user: CurrentUser) -> Result<Response> {
    if let Some(token) = &user.token {
        AuthService::new(&state.db, state.config.session_ttl_hours)
            .logout(token)
            .await?;
    }
    Ok((
        [(header::SET_COOKIE, clear_session_cookie_header())],
        Redirect::to("/"),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/albums/3/edit")), "/albums/3/edit");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
