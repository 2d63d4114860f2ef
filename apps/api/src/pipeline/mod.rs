//! Resume generation pipeline.
//!
//! Extraction → Project Synthesis → Skill Synthesis → Metadata Assembly → Rendering,
//! strictly in that order, halting at the first failure. See `orchestrator` for the
//! state machine and `state` for what one run carries.

pub mod assembly;
pub mod error;
pub mod extraction;
pub mod orchestrator;
pub mod projects;
pub mod prompts;
pub mod skills;
pub mod state;

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::llm_client::json::parse_json_object;
use crate::llm_client::{LlmError, ModelClient};
use crate::schema::{validate_payload, Validate};

pub use error::StageCause;
pub use orchestrator::Pipeline;
pub use state::{PipelineState, PipelineStatus, Stage};

/// One model call bounded by `limit`. Exceeding the limit is an ordinary call failure.
pub(crate) async fn call_model(
    client: &dyn ModelClient,
    limit: Duration,
    system: &str,
    user: &str,
) -> Result<String, LlmError> {
    match tokio::time::timeout(limit, client.complete(system, user)).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::Timeout {
            secs: limit.as_secs(),
        }),
    }
}

/// Locates the JSON object in a model response and validates it as `T`.
pub(crate) fn parse_response<T>(raw: &str) -> Result<T, StageCause>
where
    T: DeserializeOwned + Validate,
{
    let payload = parse_json_object(raw)?;
    Ok(validate_payload(payload)?)
}
