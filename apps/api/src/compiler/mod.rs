//! Document compilers: turn rendered LaTeX source into PDF bytes.
//!
//! Compilation is an external, failure-prone step that sits outside the pipeline:
//! handlers call it on source the pipeline already produced. Two backends exist,
//! selected by `LATEX_COMPILER`: a hosted compile service and a local `pdflatex`.

pub mod local;
pub mod online;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use local::LocalCompiler;
pub use online::OnlineCompiler;

/// Leading bytes of every PDF file.
pub const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("compile service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("compiler produced a non-PDF response: {0}")]
    NotPdf(String),

    #[error("compilation timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("compiler exited with status {code:?}: {log_tail}")]
    Process {
        code: Option<i32>,
        log_tail: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("all compilation attempts failed: {0}")]
    AllFailed(String),
}

#[async_trait]
pub trait DocumentCompiler: Send + Sync {
    /// Short backend name for logs and `/health`.
    fn name(&self) -> &'static str;

    async fn compile(&self, source: &str) -> Result<Bytes, CompileError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerMode {
    Online,
    Local,
}

impl FromStr for CompilerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(CompilerMode::Online),
            "local" => Ok(CompilerMode::Local),
            other => Err(format!("unknown compiler mode '{other}' (expected 'online' or 'local')")),
        }
    }
}

/// Builds the backend chosen in config.
pub fn from_config(config: &crate::config::Config) -> Result<Arc<dyn DocumentCompiler>, CompileError> {
    Ok(match config.latex_compiler {
        CompilerMode::Online => Arc::new(OnlineCompiler::new(
            config.latex_service_url.clone(),
            config.compile_timeout,
        )?),
        CompilerMode::Local => Arc::new(LocalCompiler::new(
            config.pdflatex_path.clone(),
            config.compile_timeout,
        )),
    })
}

/// The first `max_chars` characters of `text`, for error messages.
pub(crate) fn snippet(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &trimmed[..end]),
        None => trimmed.to_string(),
    }
}
