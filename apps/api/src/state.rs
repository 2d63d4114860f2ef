use std::sync::Arc;

use crate::compiler::DocumentCompiler;
use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data: every pipeline run owns its own `PipelineState`.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    /// Pluggable compiler backend. Default: OnlineCompiler. Swap via LATEX_COMPILER.
    pub compiler: Arc<dyn DocumentCompiler>,
}
