//! Path parameters.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::{AppError, Result};

/// The `:id` segment of a record route. A segment that is not an `i32` names
/// no record, so it is Not-Found rather than a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i32);

pub fn parse_record_id(raw: &str) -> Result<i32> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("No record with id {}", raw)))
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(e.body_text()))?;
        parse_record_id(&raw).map(RecordId)
    }
}
