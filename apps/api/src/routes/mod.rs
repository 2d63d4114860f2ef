pub mod compile;
pub mod generate;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/generate-resume",
            post(generate::generate_resume_handler)
                .layer(DefaultBodyLimit::max(generate::MAX_UPLOAD_BYTES)),
        )
        .route("/api/compile-latex", post(compile::compile_latex_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use bytes::Bytes;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::compiler::{CompileError, DocumentCompiler};
    use crate::pipeline::testing::ScriptedModel;
    use crate::pipeline::Pipeline;
    use crate::render::TemplateRenderer;

    const BOUNDARY: &str = "tailor-test-boundary";

    const EXTRACTION_REPLY: &str = r#"{"name": "Jane Doe", "email": "jane@x.com", "phone": "555-1234",
        "experience": [{"title": "Engineer", "organization": "Acme Corp", "dates": "2021 -- Present",
                        "bullets": ["Shipped a 3-region replicated cache"]}]}"#;
    const PROJECTS_REPLY: &str = r#"{"projects": [
        {"name": "Raft KV", "technologies": ["Go"], "achievements": ["Sustained 50k writes/s"]},
        {"name": "Gossip", "technologies": ["Rust"], "achievements": ["Detected failures in 2s"]},
        {"name": "Tracing", "technologies": ["Kafka"], "achievements": ["Ingested 1M spans/min"]}]}"#;
    const SKILLS_REPLY: &str = r#"{"skills": {"Languages": ["Go", "Rust"]}}"#;

    /// Succeeds with a fixed PDF unless the source contains `\fail`.
    struct FakeCompiler;

    #[async_trait]
    impl DocumentCompiler for FakeCompiler {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn compile(&self, source: &str) -> Result<Bytes, CompileError> {
            if source.contains(r"\fail") {
                return Err(CompileError::Process {
                    code: Some(1),
                    log_tail: "! Undefined control sequence.".to_string(),
                });
            }
            Ok(Bytes::from_static(b"%PDF-1.5 fake"))
        }
    }

    fn app(model: ScriptedModel) -> Router {
        build_router(AppState {
            pipeline: Pipeline::new(
                Arc::new(model),
                TemplateRenderer::builtin(),
                Duration::from_secs(30),
            ),
            compiler: Arc::new(FakeCompiler),
        })
    }

    fn multipart_request(fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/api/generate-resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app(ScriptedModel::texts(&[])).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["compiler"], "fake");
    }

    #[tokio::test]
    async fn test_generate_resume_from_text() {
        let model = ScriptedModel::texts(&[EXTRACTION_REPLY, PROJECTS_REPLY, SKILLS_REPLY]);
        let request = multipart_request(&[
            ("resume_text", "Jane Doe, jane@x.com, 555-1234"),
            ("job_description", "Build distributed systems in Go."),
        ]);
        let response = app(model).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["metadata"]["name"], "Jane Doe");
        assert_eq!(body["debug"]["generated_projects_count"], 3);
        assert!(body["latex_code"].as_str().unwrap().contains("Jane Doe"));
    }

    #[tokio::test]
    async fn test_generate_resume_reports_failed_stage() {
        let model = ScriptedModel::texts(&[EXTRACTION_REPLY, r#"{"projects": []}"#]);
        let request = multipart_request(&[
            ("resume_text", "Jane Doe, jane@x.com"),
            ("job_description", "Build distributed systems."),
        ]);
        let response = app(model).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "PIPELINE_FAILED");
        assert_eq!(body["error"]["stage"], "synthesizing_projects");
        assert!(body.get("latex_code").is_none());
    }

    #[tokio::test]
    async fn test_generate_resume_requires_job_description() {
        let model = ScriptedModel::texts(&[]);
        let request = multipart_request(&[("resume_text", "Jane Doe")]);
        let response = app(model).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_resume_rejects_non_pdf_upload() {
        let request = multipart_request(&[
            ("resume_file", "definitely not a pdf"),
            ("job_description", "Build distributed systems."),
        ]);
        let response = app(ScriptedModel::texts(&[])).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNREADABLE_RESUME");
    }

    fn compile_request(latex: &str) -> Request<Body> {
        let body = format!("latex_code={}", latex.replace('\\', "%5C").replace(' ', "+"));
        Request::builder()
            .method("POST")
            .uri("/api/compile-latex")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_compile_latex_returns_pdf() {
        let response = app(ScriptedModel::texts(&[]))
            .oneshot(compile_request(r"\documentclass{article}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_compile_latex_failure_is_422() {
        let response = app(ScriptedModel::texts(&[]))
            .oneshot(compile_request(r"\fail"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "COMPILATION_FAILED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Undefined control sequence"));
    }
}
