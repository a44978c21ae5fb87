//! Error types for catalog validation and the HTTP API.
//!
//! Quiz transitions that the engine refuses are not errors; see `session::Outcome`.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;
use uuid::Uuid;

/// Errors emitted while assembling a `Catalog`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
  #[error("catalog has no rules")]
  Empty,
  #[error("duplicate rule name '{0}'")]
  DuplicateName(String),
  #[error("rule name must not be empty")]
  BlankName,
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
  #[error("unknown session {0}")]
  UnknownSession(Uuid),
  #[error("unknown rule '{0}'")]
  UnknownRule(String),
  #[error("too many live sessions (limit {0})")]
  SessionLimit(usize),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::UnknownSession(_) | ApiError::UnknownRule(_) => StatusCode::NOT_FOUND,
      ApiError::SessionLimit(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let body = serde_json::json!({ "error": self.to_string() });
    (self.status(), Json(body)).into_response()
  }
}
