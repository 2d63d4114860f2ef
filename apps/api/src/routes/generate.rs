use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::pdf_text;
use crate::pipeline::{PipelineState, PipelineStatus};
use crate::schema::{non_blank, ResumeMetadata};
use crate::state::AppState;

/// Upload limit for the generate endpoint (PDF plus form fields).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Default)]
struct GenerateForm {
    resume_file: Option<Bytes>,
    resume_text: Option<String>,
    job_description: Option<String>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub metadata: ResumeMetadata,
    pub latex_code: String,
    pub debug: RunSummary,
}

#[derive(Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub duration_ms: i64,
    pub extracted_experiences_count: usize,
    pub generated_projects_count: usize,
    pub skill_categories_count: usize,
    pub final_experiences_count: usize,
    pub final_projects_count: usize,
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Failed to read multipart data: {}", e.body_text()))
}

async fn read_form(mut multipart: Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume_file" => form.resume_file = Some(field.bytes().await.map_err(multipart_error)?),
            "resume_text" => form.resume_text = Some(field.text().await.map_err(multipart_error)?),
            "job_description" => {
                form.job_description = Some(field.text().await.map_err(multipart_error)?)
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/generate-resume
///
/// Multipart fields: `resume_file` (PDF) or `resume_text`, plus `job_description`.
/// A PDF upload takes precedence over pasted text.
pub async fn generate_resume_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let form = read_form(multipart).await?;

    let job_description = non_blank(form.job_description)
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    let resume_text = match (form.resume_file.filter(|f| !f.is_empty()), non_blank(form.resume_text)) {
        (Some(pdf), _) => pdf_text::extract_text(pdf).await?,
        (None, Some(text)) => text,
        (None, None) => {
            return Err(AppError::Validation(
                "resume_file or resume_text is required".to_string(),
            ))
        }
    };

    let run = state
        .pipeline
        .run(PipelineState::new(resume_text, job_description))
        .await;

    match run.status() {
        PipelineStatus::Done => {}
        PipelineStatus::Failed { stage, reason } => {
            return Err(AppError::Pipeline {
                stage: *stage,
                reason: reason.clone(),
            })
        }
        other => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "pipeline {} returned in non-terminal status {other:?}",
                run.run_id()
            )))
        }
    }

    let (Some(metadata), Some(latex_code)) = (run.resume_metadata(), run.rendered_document()) else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "pipeline {} finished without a document",
            run.run_id()
        )));
    };

    let summary = RunSummary {
        run_id: run.run_id(),
        duration_ms: run.duration_ms().unwrap_or_default(),
        extracted_experiences_count: run.extracted_info().map_or(0, |i| i.experience.len()),
        generated_projects_count: run.generated_projects().map_or(0, <[_]>::len),
        skill_categories_count: run.generated_skills().map_or(0, <[_]>::len),
        final_experiences_count: metadata.experience.len(),
        final_projects_count: metadata.projects.len(),
    };
    info!(
        "Generated resume for run {} in {}ms",
        summary.run_id, summary.duration_ms
    );

    Ok(Json(GenerateResponse {
        success: true,
        metadata: metadata.clone(),
        latex_code: latex_code.to_string(),
        debug: summary,
    }))
}
