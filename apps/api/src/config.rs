use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::compiler::CompilerMode;

const DEFAULT_LATEX_SERVICE_URL: &str = "https://latex.ytotech.com/builds/sync";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Bound on a single generative-model call.
    pub llm_timeout: Duration,
    /// Retries for 429/5xx/network failures. 0 = fail fast.
    pub llm_max_retries: u32,
    pub latex_compiler: CompilerMode,
    pub latex_service_url: String,
    pub pdflatex_path: PathBuf,
    pub compile_timeout: Duration,
    /// Template override; the built-in template is used when unset.
    pub resume_template_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            anthropic_api_key: var("ANTHROPIC_API_KEY").with_context(|| {
                "Required environment variable 'ANTHROPIC_API_KEY' is not set".to_string()
            })?,
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
            llm_timeout: Duration::from_secs(
                or_default("LLM_TIMEOUT_SECS", "90")
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            llm_max_retries: or_default("LLM_MAX_RETRIES", "0")
                .parse::<u32>()
                .context("LLM_MAX_RETRIES must be a non-negative integer")?,
            latex_compiler: or_default("LATEX_COMPILER", "online")
                .parse::<CompilerMode>()
                .map_err(|e| anyhow!(e))
                .context("LATEX_COMPILER is invalid")?,
            latex_service_url: or_default("LATEX_SERVICE_URL", DEFAULT_LATEX_SERVICE_URL),
            pdflatex_path: PathBuf::from(or_default("PDFLATEX_PATH", "pdflatex")),
            compile_timeout: Duration::from_secs(
                or_default("COMPILE_TIMEOUT_SECS", "45")
                    .parse::<u64>()
                    .context("COMPILE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            resume_template_path: var("RESUME_TEMPLATE_PATH").map(PathBuf::from),
        })
    }
}
