use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use super::{snippet, CompileError, DocumentCompiler, PDF_MAGIC};

const JOB_NAME: &str = "resume";
const LOG_TAIL_LINES: usize = 20;

/// Runs a local `pdflatex` in a throwaway directory.
#[derive(Debug, Clone)]
pub struct LocalCompiler {
    program: PathBuf,
    timeout: Duration,
}

impl LocalCompiler {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    async fn run(&self, workdir: &Path) -> Result<(), CompileError> {
        let tex_file = format!("{JOB_NAME}.tex");
        let mut cmd = TokioCommand::new(&self.program);
        cmd.current_dir(workdir)
            .args(["-interaction=nonstopmode", "-halt-on-error", tex_file.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| CompileError::Spawn {
            program: self.program.display().to_string(),
            reason: e.to_string(),
        })?;

        // On timeout the child is dropped, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CompileError::Timeout {
                secs: self.timeout.as_secs(),
            })??;

        if output.status.success() {
            return Ok(());
        }

        let log = tokio::fs::read_to_string(workdir.join(format!("{JOB_NAME}.log")))
            .await
            .unwrap_or_else(|_| String::from_utf8_lossy(&output.stdout).into_owned());
        Err(CompileError::Process {
            code: output.status.code(),
            log_tail: log_tail(&log, LOG_TAIL_LINES),
        })
    }
}

/// The last `lines` non-empty lines of a compile log.
fn log_tail(log: &str, lines: usize) -> String {
    let kept: Vec<&str> = log
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();
    kept[kept.len().saturating_sub(lines)..].join("\n")
}

#[async_trait]
impl DocumentCompiler for LocalCompiler {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn compile(&self, source: &str) -> Result<Bytes, CompileError> {
        let workdir = tempfile::tempdir()?;
        tokio::fs::write(workdir.path().join(format!("{JOB_NAME}.tex")), source).await?;
        debug!("Compiling in {}", workdir.path().display());

        self.run(workdir.path()).await?;

        let pdf = tokio::fs::read(workdir.path().join(format!("{JOB_NAME}.pdf"))).await?;
        if !pdf.starts_with(PDF_MAGIC) {
            return Err(CompileError::NotPdf(snippet(
                &String::from_utf8_lossy(&pdf),
                100,
            )));
        }

        info!("Compiled PDF locally ({} bytes)", pdf.len());
        Ok(Bytes::from(pdf))
    }
}
