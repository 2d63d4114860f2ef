use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::{info, warn};

use super::{snippet, CompileError, DocumentCompiler, PDF_MAGIC};

const ENGINE: &str = "pdflatex";

#[derive(Debug, Serialize)]
struct BuildRequest<'a> {
    compiler: &'a str,
    resources: Vec<BuildResource<'a>>,
}

#[derive(Debug, Serialize)]
struct BuildResource<'a> {
    main: bool,
    content: &'a str,
}

/// Compiles through a hosted LaTeX build service (latex.ytotech.com API).
///
/// Tries a JSON POST first and falls back to a GET with the source in the query
/// string. Errors from both attempts are reported together.
#[derive(Clone)]
pub struct OnlineCompiler {
    client: Client,
    url: String,
    timeout: Duration,
}

impl OnlineCompiler {
    pub fn new(url: String, timeout: Duration) -> Result<Self, CompileError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url,
            timeout,
        })
    }

    async fn post_json(&self, source: &str) -> Result<Bytes, CompileError> {
        let body = BuildRequest {
            compiler: ENGINE,
            resources: vec![BuildResource {
                main: true,
                content: source,
            }],
        };
        let response = self
            .client
            .post(&self.url)
            .header("accept", "application/pdf")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_pdf(response).await
    }

    async fn get_query(&self, source: &str) -> Result<Bytes, CompileError> {
        let response = self
            .client
            .get(&self.url)
            .header("accept", "application/pdf")
            .query(&[("content", source), ("compiler", ENGINE)])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_pdf(response).await
    }

    async fn read_pdf(&self, response: Response) -> Result<Bytes, CompileError> {
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        accept_response(status, body)
    }

    fn transport_error(&self, err: reqwest::Error) -> CompileError {
        if err.is_timeout() {
            CompileError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            CompileError::Http(err)
        }
    }
}

/// A response is a success only on 200/201 with a body that is actually a PDF.
fn accept_response(status: StatusCode, body: Bytes) -> Result<Bytes, CompileError> {
    let text = || snippet(&String::from_utf8_lossy(&body), 300);

    if status != StatusCode::OK && status != StatusCode::CREATED {
        return Err(CompileError::Service {
            status: status.as_u16(),
            body: text(),
        });
    }
    if !body.starts_with(PDF_MAGIC) {
        return Err(CompileError::NotPdf(text()));
    }
    Ok(body)
}

#[async_trait]
impl DocumentCompiler for OnlineCompiler {
    fn name(&self) -> &'static str {
        "online"
    }

    async fn compile(&self, source: &str) -> Result<Bytes, CompileError> {
        let mut failures = Vec::new();

        match self.post_json(source).await {
            Ok(pdf) => {
                info!("Compiled PDF via JSON POST ({} bytes)", pdf.len());
                return Ok(pdf);
            }
            Err(e) => {
                warn!("JSON POST compilation failed: {e}");
                failures.push(format!("JSON POST: {e}"));
            }
        }

        match self.get_query(source).await {
            Ok(pdf) => {
                info!("Compiled PDF via GET fallback ({} bytes)", pdf.len());
                Ok(pdf)
            }
            Err(e) => {
                warn!("GET compilation failed: {e}");
                failures.push(format!("GET: {e}"));
                Err(CompileError::AllFailed(failures.join("; ")))
            }
        }
    }
}
