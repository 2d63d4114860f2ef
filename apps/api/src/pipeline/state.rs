use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{ExtractedInfo, Project, ResumeMetadata, SkillCategory};

use super::error::StageError;

/// The five stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extracting,
    SynthesizingProjects,
    SynthesizingSkills,
    AssemblingMetadata,
    Rendering,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extracting => "extracting",
            Stage::SynthesizingProjects => "synthesizing_projects",
            Stage::SynthesizingSkills => "synthesizing_skills",
            Stage::AssemblingMetadata => "assembling_metadata",
            Stage::Rendering => "rendering",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    /// Created, no stage entered yet.
    Pending,
    Running(Stage),
    Done,
    Failed { stage: Stage, reason: String },
}

/// Everything one pipeline run knows. Owned by exactly one stage at a time.
///
/// Inputs are fixed at construction. Each output slot is filled once, by its own
/// stage, in stage order; a failed stage leaves its slot and every later slot empty.
#[derive(Debug)]
pub struct PipelineState {
    pub(super) run_id: Uuid,
    pub(super) started_at: DateTime<Utc>,
    pub(super) finished_at: Option<DateTime<Utc>>,

    pub(super) resume_text: String,
    pub(super) job_description: String,

    // Extracting
    pub(super) extracted_info: Option<ExtractedInfo>,
    // SynthesizingProjects
    pub(super) generated_projects: Option<Vec<Project>>,
    // SynthesizingSkills
    pub(super) generated_skills: Option<Vec<SkillCategory>>,
    // AssemblingMetadata
    pub(super) resume_metadata: Option<ResumeMetadata>,
    // Rendering
    pub(super) rendered_document: Option<String>,

    pub(super) errors: Vec<String>,
    pub(super) status: PipelineStatus,
}

impl PipelineState {
    pub fn new(resume_text: impl Into<String>, job_description: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            resume_text: resume_text.into(),
            job_description: job_description.into(),
            extracted_info: None,
            generated_projects: None,
            generated_skills: None,
            resume_metadata: None,
            rendered_document: None,
            errors: Vec::new(),
            status: PipelineStatus::Pending,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn extracted_info(&self) -> Option<&ExtractedInfo> {
        self.extracted_info.as_ref()
    }

    pub fn generated_projects(&self) -> Option<&[Project]> {
        self.generated_projects.as_deref()
    }

    pub fn generated_skills(&self) -> Option<&[SkillCategory]> {
        self.generated_skills.as_deref()
    }

    pub fn resume_metadata(&self) -> Option<&ResumeMetadata> {
        self.resume_metadata.as_ref()
    }

    pub fn rendered_document(&self) -> Option<&str> {
        self.rendered_document.as_deref()
    }

    pub fn status(&self) -> &PipelineStatus {
        &self.status
    }

    /// Wall-clock duration of the run, once it has reached a terminal state.
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    pub(super) fn complete(&mut self) {
        self.status = PipelineStatus::Done;
        self.finished_at = Some(Utc::now());
    }

    /// `errors` keeps the full diagnostic; the status carries only the caller-facing reason.
    pub(super) fn fail(&mut self, err: &StageError) {
        self.errors.push(err.to_string());
        self.status = PipelineStatus::Failed {
            stage: err.stage(),
            reason: err.public_reason(),
        };
        self.finished_at = Some(Utc::now());
    }
}
