//! One-shot confirmation messages carried across a redirect in a cookie.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use base64::{engine::general_purpose, Engine as _};

use super::principal::cookie_value;

pub const FLASH_COOKIE: &str = "flash";

/// The message left by the previous request, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash(pub Option<String>);

impl Flash {
    pub fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Expire the cookie on `response` once the message has been shown.
    pub fn consume(&self, mut response: Response) -> Response {
        if self.0.is_some() {
            if let Ok(value) = HeaderValue::from_str(&clear_flash_header()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let message = cookie_value(&parts.headers, FLASH_COOKIE)
            .and_then(|raw| general_purpose::URL_SAFE_NO_PAD.decode(raw).ok())
            .and_then(|bytes| String::from_utf8(bytes).ok());
        Ok(Self(message))
    }
}

pub fn flash_cookie_header(message: &str) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax",
        FLASH_COOKIE,
        general_purpose::URL_SAFE_NO_PAD.encode(message)
    )
}

pub fn clear_flash_header() -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", FLASH_COOKIE)
}

/// A 303 to `to` that shows `message` on the next page.
pub fn redirect_with_flash(to: &str, message: &str) -> Response {
    (
        [(header::SET_COOKIE, flash_cookie_header(message))],
        Redirect::to(to),
    )
        .into_response()
}
