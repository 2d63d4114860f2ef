use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CompileForm {
    #[serde(default)]
    pub latex_code: String,
}

/// POST /api/compile-latex
/// Compiles LaTeX source (form field `latex_code`) and returns the PDF bytes.
pub async fn compile_latex_handler(
    State(state): State<AppState>,
    Form(form): Form<CompileForm>,
) -> Result<Response, AppError> {
    if form.latex_code.trim().is_empty() {
        return Err(AppError::Validation("latex_code is required".to_string()));
    }

    let pdf = state.compiler.compile(&form.latex_code).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"resume.pdf\""),
        ],
        pdf,
    )
        .into_response())
}
