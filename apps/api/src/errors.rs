use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ai_client::SuggestionError;
use crate::export::orchestrator::ExportError;
use crate::render::RenderError;
use crate::share::email::EmailError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Credits exhausted: {0}")]
    CreditsExhausted(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("AI error: {0}")]
    Ai(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::RateLimited(_) => "RATE_LIMITED",
            AppError::CreditsExhausted(_) => "CREDITS_EXHAUSTED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Ai(_) => "AI_ERROR",
            AppError::Email(_) => "EMAIL_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::CreditsExhausted(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Ai(_) | AppError::Email(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Render(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the caller. Internal failures are logged and masked.
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::RateLimited(msg)
            | AppError::CreditsExhausted(msg) => msg.clone(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred".to_string()
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                "The document could not be rendered".to_string()
            }
            AppError::Ai(msg) => {
                tracing::error!("AI error: {msg}");
                "The AI service could not produce a suggestion".to_string()
            }
            AppError::Email(msg) => {
                tracing::error!("Email error: {msg}");
                "Failed to send email. Please try again.".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ResumeNotFound(id) => AppError::NotFound(format!("Resume {id} not found")),
            StoreError::RowNotFound(id) => AppError::NotFound(format!("Row {id} not found")),
            StoreError::NotOwner(_) => AppError::Forbidden,
            StoreError::Invalid(msg) => AppError::Validation(msg),
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Unavailable(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::MissingPersonalInfo => AppError::Validation(err.to_string()),
            ExportError::Store(e) => e.into(),
            ExportError::Render(e) => AppError::Render(e),
        }
    }
}

impl From<SuggestionError> for AppError {
    fn from(err: SuggestionError) -> Self {
        match err {
            SuggestionError::RateLimited => {
                AppError::RateLimited("Rate limit exceeded. Please try again later.".to_string())
            }
            SuggestionError::CreditsExhausted => AppError::CreditsExhausted(
                "AI credits exhausted. Please add credits to continue.".to_string(),
            ),
            other => AppError::Ai(other.to_string()),
        }
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::InvalidRecipient(msg) => AppError::Validation(msg),
            EmailError::Template(e) => AppError::Internal(anyhow::anyhow!(e)),
            other => AppError::Email(other.to_string()),
        }
    }
}
