use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Field-keyed validation messages. Non-field errors live under `__all__`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

pub const NON_FIELD_ERRORS: &str = "__all__";

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Login required")]
    LoginRequired,

    #[error("User {user_id} has no music manager profile")]
    MissingProfile { user_id: i32 },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::LoginRequired | Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            Self::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "Database error occurred".to_string()
            }
            Self::NotFound(ref msg) => msg.clone(),
            Self::Validation(ref errors) => {
                let body = Json(json!({
                    "error": "Validation failed",
                    "fields": errors,
                }));
                return (status, body).into_response();
            }
            Self::PermissionDenied(ref msg) => msg.clone(),
            Self::LoginRequired => "Authentication credentials were not provided".to_string(),
            Self::MissingProfile { user_id } => {
                tracing::error!(user_id, "Authenticated user has no music manager profile");
                "User profile is missing".to_string()
            }
            Self::Authentication(ref msg) => msg.clone(),
            Self::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                msg.clone()
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_collect_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("title", "This field is required.");
        errors.add("price", "A valid number is required.");
        errors.add("price", "Ensure this value is less than or equal to 999.99.");

        assert_eq!(errors.get("title"), ["This field is required.".to_string()]);
        assert_eq!(errors.get("price").len(), 2);
        assert!(errors.get("artist").is_empty());
        assert!(matches!(errors.into_result(), Err(AppError::Validation(_))));
    }

    #[test]
    fn status_codes_keep_denied_and_missing_apart() {
        assert_eq!(
            AppError::PermissionDenied("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("Album not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MissingProfile { user_id: 1 }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::LoginRequired.status(), StatusCode::UNAUTHORIZED);
    }
}
