use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::assist::AssistError;
use crate::export::ExportError;
use crate::models::content::EditError;
use crate::models::section::SectionOrderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document has not been rendered yet")]
    RenderNotReady,

    #[error("An export is already running for this document")]
    ExportInProgress,

    #[error("Edit conflict: {0}")]
    EditConflict(String),

    #[error("Missing or rejected AI credential")]
    MissingCredential,

    #[error("No readable text: {0}")]
    TextEmpty(String),

    #[error("External service failure: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<SectionOrderError> for AppError {
    fn from(e: SectionOrderError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::RenderNotReady => AppError::RenderNotReady,
            ExportError::TooLarge { .. } => AppError::Validation(e.to_string()),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<AssistError> for AppError {
    fn from(e: AssistError) -> Self {
        match e {
            AssistError::MissingCredential => AppError::MissingCredential,
            AssistError::TextEmpty(msg) => AppError::TextEmpty(msg),
            AssistError::InvalidTarget(msg) | AssistError::Unreadable(msg) => {
                AppError::Validation(msg)
            }
            AssistError::Service(msg) => AppError::ExternalService(msg),
            AssistError::Storage(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RenderNotReady => (
                StatusCode::CONFLICT,
                "RENDER_NOT_READY",
                "Render the document before exporting it".to_string(),
            ),
            AppError::ExportInProgress => (
                StatusCode::CONFLICT,
                "EXPORT_IN_PROGRESS",
                "An export is already running for this document".to_string(),
            ),
            AppError::EditConflict(msg) => (StatusCode::CONFLICT, "EDIT_CONFLICT", msg.clone()),
            AppError::MissingCredential => (
                StatusCode::UNAUTHORIZED,
                "MISSING_CREDENTIAL",
                "An AI API key is required; store one and retry".to_string(),
            ),
            AppError::TextEmpty(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "TEXT_EMPTY", msg.clone())
            }
            AppError::ExternalService(msg) => {
                tracing::error!("External service error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTERNAL_SERVICE_FAILURE",
                    "The AI service could not complete the request".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(AppError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::RenderNotReady), StatusCode::CONFLICT);
        assert_eq!(status_of(AppError::ExportInProgress), StatusCode::CONFLICT);
        assert_eq!(
            status_of(AppError::EditConflict("summary".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(AppError::MissingCredential), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::TextEmpty("blank".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::ExternalService("down".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_export_error_conversion() {
        assert!(matches!(
            AppError::from(ExportError::RenderNotReady),
            AppError::RenderNotReady
        ));
    }

    #[test]
    fn test_assist_error_conversion() {
        assert!(matches!(
            AppError::from(AssistError::MissingCredential),
            AppError::MissingCredential
        ));
        assert!(matches!(
            AppError::from(AssistError::TextEmpty("short".into())),
            AppError::TextEmpty(_)
        ));
    }
}
