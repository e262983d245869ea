//! Request identity, read from a bearer token or the session cookie.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::error::{AppError, Result};
use crate::permissions::Actor;
use crate::services::auth::{resolve_actor, AuthService, Principal};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// The caller behind a request. Missing, unknown and expired tokens all
/// resolve to an anonymous caller rather than a rejection.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser {
    pub principal: Option<Principal>,
    pub token: Option<String>,
}

impl CurrentUser {
    /// Attach the music manager profile. Fails when an authenticated user has none.
    pub async fn actor(&self, state: &AppState) -> Result<Option<Actor>> {
        resolve_actor(&state.db, self.principal.as_ref()).await
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = bearer_token(&parts.headers).or_else(|| session_cookie(&parts.headers))
        else {
            return Ok(Self::default());
        };

        let principal = AuthService::new(&state.db, state.config.session_ttl_hours)
            .principal_for_token(&token)
            .await?;
        if principal.is_none() {
            tracing::debug!("Ignoring unknown or expired session token");
        }

        Ok(Self {
            principal,
            token: Some(token),
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Non-empty value of the cookie called `name`.
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty())
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE)
}

/// `Set-Cookie` value that stores a session token for `max_age_secs`.
pub fn session_cookie_header(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

pub fn clear_session_cookie_header() -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
