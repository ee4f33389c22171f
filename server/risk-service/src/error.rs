//! HTTP error mapping: status code + JSON `ErrorOutput` body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use risk_engine::types::ErrorOutput;
use risk_engine::EngineError;

#[derive(Debug)]
pub struct ApiError {
  status: StatusCode,
  body: ErrorOutput,
}

impl ApiError {
  pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status,
      body: ErrorOutput::new(message),
    }
  }

  pub fn not_found(message: &str) -> Self {
    Self::new(StatusCode::NOT_FOUND, message)
  }
}

impl From<EngineError> for ApiError {
  fn from(e: EngineError) -> Self {
    let status = match &e {
      EngineError::NoData => StatusCode::NOT_FOUND,
      EngineError::EmptyRun => StatusCode::UNPROCESSABLE_ENTITY,
      EngineError::Config { .. } => StatusCode::BAD_REQUEST,
      EngineError::Io(_) | EngineError::Csv(_) | EngineError::Json(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    if status.is_server_error() {
      tracing::error!(error = %e, "request failed");
    }
    let body = match &e {
      EngineError::Config { field, reason } => {
        ErrorOutput::new(reason.clone()).with_field(field.clone())
      }
      _ => ErrorOutput::new(e.to_string()),
    };
    Self { status, body }
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::new(rejection.status(), rejection.body_text())
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::new(rejection.status(), rejection.body_text())
  }
}

impl From<tokio::task::JoinError> for ApiError {
  fn from(e: tokio::task::JoinError) -> Self {
    tracing::error!(error = %e, "blocking task failed");
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal task failed")
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status, Json(self.body)).into_response()
  }
}
