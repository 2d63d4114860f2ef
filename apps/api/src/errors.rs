use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::compiler::CompileError;
use crate::pdf_text::PdfTextError;
use crate::pipeline::Stage;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unreadable resume: {0}")]
    ResumeFile(#[from] PdfTextError),

    /// A pipeline run ended in `Failed`. Carries only the stage and a readable reason.
    #[error("Pipeline failed at {stage}: {reason}")]
    Pipeline { stage: Stage, reason: String },

    #[error("Compilation failed: {0}")]
    Compilation(#[from] CompileError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, stage) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::ResumeFile(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNREADABLE_RESUME",
                e.to_string(),
                None,
            ),
            AppError::Pipeline { stage, reason } => {
                tracing::warn!("Pipeline failed at {stage}: {reason}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "PIPELINE_FAILED",
                    reason.clone(),
                    Some(*stage),
                )
            }
            AppError::Compilation(e) => {
                tracing::warn!("Compilation failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "COMPILATION_FAILED",
                    e.to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(stage) = stage {
            error["stage"] = json!(stage);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
