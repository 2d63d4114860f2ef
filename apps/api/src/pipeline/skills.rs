//! Skill Synthesis: categorized technical skills prioritized for the job description.

use std::collections::HashSet;
use std::time::Duration;

use tracing::info;

use crate::llm_client::prompts::with_json_only;
use crate::llm_client::ModelClient;
use crate::schema::{ExtractedInfo, SkillCategory, SkillsPayload};

use super::error::{StageCause, StageError};
use super::projects::to_json;
use super::prompts::{fill, SKILLS_PROMPT_TEMPLATE, SKILLS_SYSTEM};
use super::{call_model, parse_response};

pub const MAX_SKILLS_PER_CATEGORY: usize = 7;

pub async fn synthesize_skills(
    client: &dyn ModelClient,
    limit: Duration,
    info: &ExtractedInfo,
    job_description: &str,
) -> Result<Vec<SkillCategory>, StageError> {
    let system = with_json_only(SKILLS_SYSTEM);
    let experience_json = to_json(&info.experience);
    let prompt = fill(
        SKILLS_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("experience_json", &experience_json),
        ],
    );

    let raw = call_model(client, limit, &system, &prompt)
        .await
        .map_err(StageError::skills)?;
    let payload = parse_response::<SkillsPayload>(&raw).map_err(StageError::skills)?;

    let categories = normalize(payload.into_categories());
    if categories.is_empty() {
        return Err(StageError::skills(StageCause::Rejected(
            "no skill category with at least one skill".to_string(),
        )));
    }

    info!(
        "Synthesized {} skill categories ({} skills)",
        categories.len(),
        categories.iter().map(|c| c.skills.len()).sum::<usize>()
    );
    Ok(categories)
}

/// Trims names, drops case-insensitive duplicates within a category, caps each
/// category at `MAX_SKILLS_PER_CATEGORY` and drops categories left empty.
/// Category order and skill order are preserved.
pub fn normalize(categories: Vec<SkillCategory>) -> Vec<SkillCategory> {
    categories
        .into_iter()
        .filter_map(|c| {
            let category = c.category.trim().to_string();
            if category.is_empty() {
                return None;
            }

            let mut seen = HashSet::new();
            let skills: Vec<String> = c
                .skills
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
                .take(MAX_SKILLS_PER_CATEGORY)
                .map(str::to_string)
                .collect();

            (!skills.is_empty()).then_some(SkillCategory { category, skills })
        })
        .collect()
}
