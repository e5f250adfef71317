// order/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  // Catalog service unreachable, answered with an error, or sent a body we could not read.
  #[error("Catalog Service Error: {0}")]
  Catalog(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Event Publication Error: {0}")]
  Publish(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Lets helpers built on anyhow use `?` inside handlers and services.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
    AppError::Catalog(err.to_string())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Catalog(_) => StatusCode::BAD_GATEWAY,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Publish(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    // 4xx are logged at warn, 5xx at error.
    if self.status_code().is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Rejecting request");
    }
    let mut builder = HttpResponse::build(self.status_code());
    match self {
      AppError::Validation(m) | AppError::NotFound(m) => builder.json(json!({"error": m})),
      AppError::Catalog(m) => builder.json(json!({"error": "Catalog service error", "detail": m})),
      AppError::Config(m) => builder.json(json!({"error": "Configuration issue", "detail": m})),
      AppError::Sqlx(_) => builder.json(json!({"error": "Database operation failed"})),
      AppError::Publish(m) => builder.json(json!({"error": "Event publication failed", "detail": m})),
      AppError::Internal(m) => builder.json(json!({"error": "An internal error occurred", "detail": m})),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
