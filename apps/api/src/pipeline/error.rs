use std::fmt;

use thiserror::Error;

use crate::llm_client::json::JsonLocateError;
use crate::llm_client::LlmError;
use crate::render::RenderError;
use crate::schema::SchemaValidationError;

use super::state::Stage;

/// What a synthesis stage was producing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisTarget {
    Projects,
    Skills,
}

impl fmt::Display for SynthesisTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisTarget::Projects => f.write_str("project"),
            SynthesisTarget::Skills => f.write_str("skill"),
        }
    }
}

/// The lower-level failure behind a model-driven stage.
#[derive(Debug, Error)]
pub enum StageCause {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error(transparent)]
    Json(#[from] JsonLocateError),

    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    /// The output parsed but is unusable (e.g. nothing left after normalization).
    #[error("{0}")]
    Rejected(String),
}

impl StageCause {
    /// Caller-facing wording. Upstream bodies and transport errors stay in the logs.
    fn summary(&self) -> String {
        match self {
            StageCause::Model(LlmError::Timeout { secs }) => {
                format!("model call timed out after {secs}s")
            }
            StageCause::Model(_) => "model call failed".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    /// `raw_response` is kept for diagnostics only; it is logged, never returned to callers.
    #[error("extraction failed: {cause}")]
    Extraction {
        cause: StageCause,
        raw_response: Option<String>,
    },

    #[error("{target} synthesis failed: {cause}")]
    Synthesis {
        target: SynthesisTarget,
        cause: StageCause,
    },

    #[error("metadata assembly failed: {0}")]
    Assembly(SchemaValidationError),

    #[error("rendering failed: {0}")]
    Rendering(RenderError),
}

impl StageError {
    pub fn extraction(cause: impl Into<StageCause>, raw_response: Option<String>) -> Self {
        StageError::Extraction {
            cause: cause.into(),
            raw_response,
        }
    }

    pub fn projects(cause: impl Into<StageCause>) -> Self {
        StageError::Synthesis {
            target: SynthesisTarget::Projects,
            cause: cause.into(),
        }
    }

    pub fn skills(cause: impl Into<StageCause>) -> Self {
        StageError::Synthesis {
            target: SynthesisTarget::Skills,
            cause: cause.into(),
        }
    }

    /// The stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Extraction { .. } => Stage::Extracting,
            StageError::Synthesis {
                target: SynthesisTarget::Projects,
                ..
            } => Stage::SynthesizingProjects,
            StageError::Synthesis {
                target: SynthesisTarget::Skills,
                ..
            } => Stage::SynthesizingSkills,
            StageError::Assembly(_) => Stage::AssemblingMetadata,
            StageError::Rendering(_) => Stage::Rendering,
        }
    }

    /// Like `Display`, minus upstream detail from model calls.
    pub fn public_reason(&self) -> String {
        match self {
            StageError::Extraction { cause, .. } => {
                format!("extraction failed: {}", cause.summary())
            }
            StageError::Synthesis { target, cause } => {
                format!("{target} synthesis failed: {}", cause.summary())
            }
            other => other.to_string(),
        }
    }

    pub fn raw_response(&self) -> Option<&str> {
        match self {
            StageError::Extraction { raw_response, .. } => raw_response.as_deref(),
            _ => None,
        }
    }
}
