//! Extraction Step: raw resume text to a structured `ExtractedInfo`.
//!
//! Only facts are extracted here (contact, experience, education, positions,
//! certifications). Projects and skills are synthesized by later stages.

use std::time::Duration;

use tracing::info;

use crate::llm_client::prompts::{with_json_only, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::ModelClient;
use crate::schema::{non_blank, ExtractedInfo};

use super::error::{StageCause, StageError};
use super::prompts::{fill, EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};
use super::{call_model, parse_response};

pub async fn extract(
    client: &dyn ModelClient,
    limit: Duration,
    resume_text: &str,
) -> Result<ExtractedInfo, StageError> {
    if resume_text.trim().is_empty() {
        return Err(StageError::extraction(
            StageCause::Rejected("resume text is empty".to_string()),
            None,
        ));
    }

    let system = with_json_only(&format!("{EXTRACTION_SYSTEM}\n\n{NO_FABRICATION_INSTRUCTION}"));
    let prompt = fill(EXTRACTION_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);

    let raw = call_model(client, limit, &system, &prompt)
        .await
        .map_err(|e| StageError::extraction(e, None))?;

    let info = parse_response::<ExtractedInfo>(&raw)
        .map_err(|cause| StageError::extraction(cause, Some(raw.clone())))?;
    let info = normalize(info);

    info!(
        experience = info.experience.len(),
        education = info.education.len(),
        positions = info.positions_of_responsibility.len(),
        certifications = info.certifications.len(),
        has_email = info.email.is_some(),
        "Extracted resume info"
    );

    Ok(info)
}

/// Trims contact fields and collapses blanks to absent.
fn normalize(info: ExtractedInfo) -> ExtractedInfo {
    ExtractedInfo {
        name: non_blank(info.name),
        email: non_blank(info.email),
        phone: non_blank(info.phone),
        github: non_blank(info.github),
        linkedin: non_blank(info.linkedin),
        ..info
    }
}
