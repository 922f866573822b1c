//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};

use scrollback_types::error::{ConfigError, SurfaceError};

use super::response::{ApiResponse, RequestTimer};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The rendering surface's command channel failed.
    Surface(SurfaceError),
    /// The surface does not know the chat.
    ChatNotFound(String),
    Validation(String),
}

impl From<SurfaceError> for AppError {
    fn from(e: SurfaceError) -> Self {
        AppError::Surface(e)
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Surface(SurfaceError::Disconnected(_)) => "SURFACE_DISCONNECTED",
            AppError::Surface(_) => "SURFACE_ERROR",
            AppError::ChatNotFound(_) => "CHAT_NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Surface(e) => e.to_string(),
            AppError::ChatNotFound(chat) => format!("Chat '{chat}' not found"),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, AppError::Surface(_)) {
            tracing::warn!(code = self.code(), error = %self.message(), "Request failed");
        }
        ApiResponse::error(self.code(), &self.message(), &RequestTimer::start()).into_response()
    }
}
