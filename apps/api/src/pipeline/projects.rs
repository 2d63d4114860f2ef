//! Project Synthesis: 3-4 job-tailored projects grounded in the candidate's background.

use std::time::Duration;

use tracing::{info, warn};

use crate::llm_client::prompts::{with_json_only, PLAUSIBILITY_INSTRUCTION};
use crate::llm_client::ModelClient;
use crate::schema::{non_blank, ExtractedInfo, Project, ProjectsPayload};

use super::error::StageError;
use super::prompts::{fill, PROJECTS_PROMPT_TEMPLATE, PROJECTS_SYSTEM};
use super::{call_model, parse_response};

/// Upper bound on projects kept from one response.
pub const MAX_PROJECTS: usize = 4;
/// Fewer than this is accepted, with a warning.
pub const MIN_EXPECTED_PROJECTS: usize = 3;

pub async fn synthesize_projects(
    client: &dyn ModelClient,
    limit: Duration,
    info: &ExtractedInfo,
    job_description: &str,
) -> Result<Vec<Project>, StageError> {
    let system = with_json_only(&format!("{PROJECTS_SYSTEM}\n\n{PLAUSIBILITY_INSTRUCTION}"));
    let experience_json = to_json(&info.experience);
    let education_json = to_json(&info.education);
    let prompt = fill(
        PROJECTS_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("experience_json", &experience_json),
            ("education_json", &education_json),
        ],
    );

    let raw = call_model(client, limit, &system, &prompt)
        .await
        .map_err(StageError::projects)?;
    let payload = parse_response::<ProjectsPayload>(&raw).map_err(StageError::projects)?;

    let mut projects: Vec<Project> = payload.projects.into_iter().map(tidy).collect();

    if projects.len() > MAX_PROJECTS {
        warn!(
            "Model returned {} projects, keeping the first {}",
            projects.len(),
            MAX_PROJECTS
        );
        projects.truncate(MAX_PROJECTS);
    } else if projects.len() < MIN_EXPECTED_PROJECTS {
        warn!(
            "Model returned only {} project(s), expected at least {}",
            projects.len(),
            MIN_EXPECTED_PROJECTS
        );
    }

    info!("Synthesized {} projects", projects.len());
    Ok(projects)
}

/// Pretty JSON for prompt context.
pub(super) fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

/// Trims every string and drops blank list entries. Validation has already
/// guaranteed at least one non-blank technology and achievement.
fn tidy(project: Project) -> Project {
    Project {
        name: project.name.trim().to_string(),
        technologies: trimmed(project.technologies),
        date: non_blank(project.date),
        achievements: trimmed(project.achievements),
    }
}

fn trimmed(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::error::{StageCause, SynthesisTarget};
    use crate::pipeline::testing::ScriptedModel;
    use crate::schema::fixtures;

    const LIMIT: Duration = Duration::from_secs(5);

    fn info() -> ExtractedInfo {
        ExtractedInfo {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            phone: None,
            github: None,
            linkedin: None,
            experience: vec![fixtures::experience("Backend Engineer", "Acme Corp")],
            education: vec![],
            positions_of_responsibility: vec![],
            certifications: vec![],
        }
    }

    fn response(count: usize) -> String {
        let projects: Vec<Project> = (1..=count)
            .map(|i| fixtures::project(&format!("Project {i}")))
            .collect();
        serde_json::json!({ "projects": projects }).to_string()
    }

    #[tokio::test]
    async fn test_prompt_carries_job_description_and_experience() {
        let model = ScriptedModel::texts(&[response(3).as_str()]);
        let projects = synthesize_projects(&model, LIMIT, &info(), "distributed systems")
            .await
            .unwrap();
        assert_eq!(projects.len(), 3);
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("distributed systems"));
        assert!(prompt.contains("Acme Corp"));
    }

    #[tokio::test]
    async fn test_job_description_slot_text_is_not_spliced() {
        let model = ScriptedModel::texts(&[response(3).as_str()]);
        let jd = "Template owner for {experience_json} and {education_json} files";
        synthesize_projects(&model, LIMIT, &info(), jd).await.unwrap();
        let prompt = &model.prompts()[0];
        assert!(prompt.contains(jd));
        assert_eq!(prompt.matches("Acme Corp").count(), 1);
    }

    #[tokio::test]
    async fn test_more_than_four_projects_are_truncated_in_order() {
        let model = ScriptedModel::texts(&[response(6).as_str()]);
        let projects = synthesize_projects(&model, LIMIT, &info(), "jd").await.unwrap();
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Project 1", "Project 2", "Project 3", "Project 4"]);
    }

    #[tokio::test]
    async fn test_fewer_than_three_projects_are_accepted() {
        let model = ScriptedModel::texts(&[response(2).as_str()]);
        let projects = synthesize_projects(&model, LIMIT, &info(), "jd").await.unwrap();
        assert_eq!(projects.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_projects_is_synthesis_error() {
        let model = ScriptedModel::texts(&[r#"{"projects": []}"#]);
        let err = synthesize_projects(&model, LIMIT, &info(), "jd").await.unwrap_err();
        assert!(matches!(
            err,
            StageError::Synthesis {
                target: SynthesisTarget::Projects,
                cause: StageCause::Schema(_),
            }
        ));
    }

    #[tokio::test]
    async fn test_project_without_technologies_is_rejected() {
        let model = ScriptedModel::texts(&[
            r#"{"projects": [{"name": "KV Store", "technologies": ["  "], "achievements": ["Served 10k qps"]}]}"#,
        ]);
        let err = synthesize_projects(&model, LIMIT, &info(), "jd").await.unwrap_err();
        assert!(err.to_string().contains("projects[0].technologies: empty"));
    }

    #[tokio::test]
    async fn test_blank_entries_are_dropped() {
        let model = ScriptedModel::texts(&[
            r#"{"projects": [{"name": " KV Store ", "technologies": ["Rust", ""], "date": "", "bullets": ["Served 10k qps", " "]}]}"#,
        ]);
        let projects = synthesize_projects(&model, LIMIT, &info(), "jd").await.unwrap();
        assert_eq!(projects[0].name, "KV Store");
        assert_eq!(projects[0].technologies, vec!["Rust"]);
        assert_eq!(projects[0].date, None);
        assert_eq!(projects[0].achievements, vec!["Served 10k qps"]);
    }
}
