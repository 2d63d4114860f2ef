//! Pipeline Orchestrator: a fixed five-stage, straight-line state machine.
//!
//! `Extracting → SynthesizingProjects → SynthesizingSkills → AssemblingMetadata →
//! Rendering → Done`, with `Failed` reachable from any stage. A stage runs only if
//! every earlier stage succeeded; there are no retries, branches or skips.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, info_span, Instrument};

use crate::llm_client::ModelClient;
use crate::render::TemplateRenderer;

use super::assembly::assemble;
use super::error::StageError;
use super::extraction::extract;
use super::projects::synthesize_projects;
use super::skills::synthesize_skills;
use super::state::{PipelineState, PipelineStatus, Stage};

/// Stateless across runs: every run owns its `PipelineState`, so one `Pipeline`
/// serves any number of concurrent requests.
#[derive(Clone)]
pub struct Pipeline {
    client: Arc<dyn ModelClient>,
    renderer: Arc<TemplateRenderer>,
    call_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        client: Arc<dyn ModelClient>,
        renderer: TemplateRenderer,
        call_timeout: Duration,
    ) -> Self {
        Self {
            client,
            renderer: Arc::new(renderer),
            call_timeout,
        }
    }

    /// Runs every stage in order and hands the state back in a terminal status.
    ///
    /// Never returns an error: a stage failure is recorded in the state
    /// (`errors`, `PipelineStatus::Failed`) and later stages are not invoked.
    /// Dropping the returned future abandons any in-flight model call.
    pub async fn run(&self, mut state: PipelineState) -> PipelineState {
        let span = info_span!("pipeline", run_id = %state.run_id);

        async move {
            info!(
                resume_chars = state.resume_text.len(),
                job_description_chars = state.job_description.len(),
                "Pipeline started"
            );

            match self.drive(&mut state).await {
                Ok(()) => {
                    state.complete();
                    info!(
                        duration_ms = state.duration_ms().unwrap_or_default(),
                        "Pipeline finished"
                    );
                }
                Err(err) => {
                    if let Some(raw) = err.raw_response() {
                        debug!(raw_response = %raw, "Unusable extraction response");
                    }
                    error!(stage = %err.stage(), "Pipeline failed: {err}");
                    state.fail(&err);
                }
            }

            state
        }
        .instrument(span)
        .await
    }

    /// Each output is written into its own slot as soon as its stage succeeds, and
    /// later stages read it back from there.
    async fn drive(&self, state: &mut PipelineState) -> Result<(), StageError> {
        let client = self.client.as_ref();
        let limit = self.call_timeout;

        // Stage 1: Extraction
        state.status = PipelineStatus::Running(Stage::Extracting);
        let info = extract(client, limit, &state.resume_text)
            .instrument(info_span!("extract"))
            .await?;
        let info = &*state.extracted_info.insert(info);

        // Stage 2: Project synthesis
        state.status = PipelineStatus::Running(Stage::SynthesizingProjects);
        let projects = synthesize_projects(client, limit, info, &state.job_description)
            .instrument(info_span!("synthesize_projects"))
            .await?;
        let projects = &*state.generated_projects.insert(projects);

        // Stage 3: Skill synthesis
        state.status = PipelineStatus::Running(Stage::SynthesizingSkills);
        let skills = synthesize_skills(client, limit, info, &state.job_description)
            .instrument(info_span!("synthesize_skills"))
            .await?;
        let skills = &*state.generated_skills.insert(skills);

        // Stage 4: Metadata assembly
        state.status = PipelineStatus::Running(Stage::AssemblingMetadata);
        let metadata = assemble(info, projects, skills).map_err(StageError::Assembly)?;
        let metadata = &*state.resume_metadata.insert(metadata);
        info!(
            experience = metadata.experience.len(),
            projects = metadata.projects.len(),
            skill_categories = metadata.technical_skills.len(),
            "Assembled resume metadata"
        );

        // Stage 5: Rendering
        state.status = PipelineStatus::Running(Stage::Rendering);
        let document = self
            .renderer
            .render(metadata)
            .map_err(StageError::Rendering)?;
        info!(bytes = document.len(), "Rendered document");
        state.rendered_document = Some(document);

        Ok(())
    }
}
