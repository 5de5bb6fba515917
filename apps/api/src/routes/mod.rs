pub mod extract;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;

use crate::chat::handlers as chat;
use crate::errors::AppError;
use crate::generation::handlers as generation;
use crate::render::handlers as render;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::storage::validate_user_id;

/// PDF uploads are small in practice; this caps a pathological one.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// `?user_id=` on per-user routes. A missing id is rejected by `user_id()` with the
/// standard JSON error envelope rather than axum's plain-text query rejection.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    #[serde(default)]
    user_id: String,
}

impl UserIdQuery {
    pub fn user_id(&self) -> Result<&str, AppError> {
        validate_user_id(&self.user_id)?;
        Ok(&self.user_id)
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume analysis
        .route("/api/analyze-resume", post(resume::handle_analyze))
        .route(
            "/api/analyze-resume/upload",
            post(resume::handle_analyze_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/extract-text",
            post(resume::handle_extract_text).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/optimize-resume", post(resume::handle_optimize))
        .route(
            "/api/resume-draft",
            get(resume::handle_get_draft)
                .put(resume::handle_put_draft)
                .delete(resume::handle_delete_draft),
        )
        // Chat
        .route("/api/chatgpt", post(chat::handle_chatgpt))
        .route(
            "/api/conversations",
            get(chat::handle_list_conversations)
                .post(chat::handle_create_conversation)
                .delete(chat::handle_clear_conversations),
        )
        .route(
            "/api/conversations/messages",
            post(chat::handle_send_to_active),
        )
        .route(
            "/api/conversations/:id",
            delete(chat::handle_delete_conversation),
        )
        .route(
            "/api/conversations/:id/select",
            post(chat::handle_select_conversation),
        )
        .route(
            "/api/conversations/:id/messages",
            post(chat::handle_send_message),
        )
        // Generation
        .route("/api/generate-resume", post(generation::handle_generate_resume))
        .route("/api/generate-prompt", post(generation::handle_generate_prompt))
        .route("/api/summarize", post(generation::handle_summarize))
        .route("/api/generate-content", post(generation::handle_generate_content))
        .route("/api/render-markdown", post(render::handle_render_markdown))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::FakeCompletion;
    use crate::llm_client::LlmError;
    use crate::models::analysis::SAMPLE_ANALYSIS_JSON;
    use crate::storage::memory::MemoryStore;

    fn app(llm: Arc<FakeCompletion>) -> Router {
        let config = Config::from_lookup(|key| {
            (key == "OPENROUTER_API_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();
        build_router(AppState::new(llm, Arc::new(MemoryStore::default()), config))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn parse(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(Arc::new(FakeCompletion::default()));
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        let body = parse(&body);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "tomato-api");
    }

    #[tokio::test]
    async fn test_analyze_accepts_prose_wrapped_json() {
        let reply = format!("Sure! Here is the analysis:\n```json\n{SAMPLE_ANALYSIS_JSON}\n```\nGood luck.");
        let llm = Arc::new(FakeCompletion::replying([reply]));
        let app = app(llm.clone());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/analyze-resume",
            Some(json!({"text": "Jane Doe, backend engineer, 7 years of Rust.", "jobDescription": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = parse(&body);
        assert_eq!(body["score"], 78);
        assert!(body["missingKeywords"].is_array());
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_analyze_malformed_reply_is_distinct_error() {
        let llm = Arc::new(FakeCompletion::replying(["I could not analyze this resume."]));
        let app = app(llm);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/analyze-resume",
            Some(json!({"text": "Some resume text"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse(&body)["code"], "MALFORMED_AI_RESPONSE");
    }

    #[tokio::test]
    async fn test_optimize_requires_job_description() {
        let llm = Arc::new(FakeCompletion::replying(["unused"]));
        let app = app(llm.clone());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/optimize-resume",
            Some(json!({"text": "My resume", "jobDescription": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = parse(&body);
        assert_eq!(body["code"], "MISSING_INPUT");
        assert_eq!(body["error"], "jobDescription is required");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_optimize_returns_reply_verbatim() {
        let llm = Arc::new(FakeCompletion::replying(["JANE DOE\nSenior Engineer"]));
        let app = app(llm);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/optimize-resume",
            Some(json!({"text": "My resume", "jobDescription": "Senior Engineer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["optimizedText"], "JANE DOE\nSenior Engineer");
    }

    #[tokio::test]
    async fn test_chatgpt_provider_error_is_plain_text() {
        let llm = Arc::new(FakeCompletion::failing(LlmError::Provider {
            status: 402,
            body: "Insufficient credits".to_string(),
        }));
        let app = app(llm);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/chatgpt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"messages": [{"role": "user", "content": "hi"}]}).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("Insufficient credits"));
    }

    #[tokio::test]
    async fn test_chatgpt_forwards_messages_and_options() {
        let llm = Arc::new(FakeCompletion::replying(["Hello!"]));
        let app = app(llm.clone());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/chatgpt",
            Some(json!({
                "messages": [
                    {"role": "system", "content": "be nice"},
                    {"role": "user", "content": "hi"}
                ],
                "model": "openai/gpt-4o-mini",
                "temperature": 0.1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["reply"], "Hello!");

        let request = &llm.requests()[0];
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.model.as_deref(), Some("openai/gpt-4o-mini"));
    }

    #[tokio::test]
    async fn test_chatgpt_rejects_empty_messages() {
        let llm = Arc::new(FakeCompletion::default());
        let app = app(llm.clone());

        let (status, body) = call(&app, Method::POST, "/api/chatgpt", Some(json!({"messages": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "messages cannot be empty");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_conversation_flow() {
        let llm = Arc::new(FakeCompletion::replying(["**Lisbon** in spring."]));
        let app = app(llm);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/conversations?user_id=user-1",
            Some(json!({"title": "Trip ideas"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created = parse(&body);
        let id = created["conversation"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["activeId"], id.as_str());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/conversations/messages?user_id=user-1",
            Some(json!({"content": "Where should I go?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let sent = parse(&body);
        assert_eq!(sent["reply"], "**Lisbon** in spring.");
        assert!(sent["replyHtml"]
            .as_str()
            .unwrap()
            .contains("<strong>Lisbon</strong>"));
        assert_eq!(sent["superseded"], false);
        assert_eq!(sent["persistence"]["status"], "ok");
        assert_eq!(sent["conversation"]["messages"].as_array().unwrap().len(), 2);

        let (_, body) = call(&app, Method::GET, "/api/conversations?user_id=user-1", None).await;
        let listed = parse(&body);
        assert_eq!(listed["conversations"][0]["title"], "Trip ideas");

        let (status, body) = call(
            &app,
            Method::DELETE,
            &format!("/api/conversations/{id}?user_id=user-1"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let remaining = parse(&body);
        assert!(remaining["conversations"].as_array().unwrap().is_empty());
        assert!(remaining["activeId"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let app = app(Arc::new(FakeCompletion::default()));
        let uri = format!("/api/conversations/{}/select?user_id=user-1", uuid::Uuid::new_v4());
        let (status, body) = call(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(parse(&body)["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_missing_or_invalid_user_id_is_rejected() {
        let app = app(Arc::new(FakeCompletion::default()));
        for uri in ["/api/conversations", "/api/conversations?user_id=..%2Fetc"] {
            let (status, body) = call(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(parse(&body)["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_resume_draft_lifecycle() {
        let app = app(Arc::new(FakeCompletion::default()));
        let uri = "/api/resume-draft?user_id=user-1";

        let (_, body) = call(&app, Method::GET, uri, None).await;
        assert!(parse(&body)["draft"].is_null());

        let draft = json!({"name": "Ada", "skills": ["math"]});
        let (status, _) = call(&app, Method::PUT, uri, Some(draft.clone())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = call(&app, Method::GET, uri, None).await;
        assert_eq!(parse(&body)["draft"], draft);

        let (status, _) = call(&app, Method::PUT, uri, Some(json!(["not", "an", "object"]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = call(&app, Method::GET, uri, None).await;
        assert!(parse(&body)["draft"].is_null());
    }

    #[tokio::test]
    async fn test_generation_endpoints() {
        let llm = Arc::new(FakeCompletion::replying(["A short summary."]));
        let app = app(llm.clone());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/summarize",
            Some(json!({"text": "A long article.", "length": "short"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["summary"], "A short summary.");

        let (status, body) = call(&app, Method::POST, "/api/generate-content", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["error"], "topic is required");
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_render_markdown() {
        let app = app(Arc::new(FakeCompletion::default()));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/render-markdown",
            Some(json!({"markdown": "# Title\n\n<script>x</script>"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let html = parse(&body)["html"].as_str().unwrap().to_string();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(!html.contains("<script>"));
    }

    async fn send_raw(
        app: &Router,
        uri: &str,
        content_type: &str,
        body: impl Into<Body>,
    ) -> (StatusCode, String) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_null_text_is_missing_input() {
        let llm = Arc::new(FakeCompletion::replying(["unused"]));
        let app = app(llm.clone());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/analyze-resume",
            Some(json!({"text": null})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = parse(&body);
        assert_eq!(body["code"], "MISSING_INPUT");
        assert_eq!(body["error"], "text is required");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_envelope() {
        let llm = Arc::new(FakeCompletion::replying(["unused"]));
        let app = app(llm.clone());

        for uri in [
            "/api/analyze-resume",
            "/api/optimize-resume",
            "/api/summarize",
            "/api/generate-content",
            "/api/render-markdown",
            "/api/conversations?user_id=u1",
        ] {
            let (status, body) = send_raw(&app, uri, "application/json", "not json").await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let body = parse(&body);
            assert_eq!(body["code"], "VALIDATION_ERROR", "{uri}");
            assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"), "{uri}");
        }
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_wrong_field_type_and_content_type_use_error_envelope() {
        let app = app(Arc::new(FakeCompletion::default()));

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/summarize",
            Some(json!({"text": 42})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["code"], "VALIDATION_ERROR");

        let (status, body) = send_raw(&app, "/api/analyze-resume", "text/plain", "resume").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_uuid_conversation_id_uses_error_envelope() {
        let app = app(Arc::new(FakeCompletion::default()));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/conversations/not-a-uuid/select?user_id=u1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_chatgpt_malformed_json_stays_plain_text() {
        let app = app(Arc::new(FakeCompletion::default()));
        let (status, body) = send_raw(&app, "/api/chatgpt", "application/json", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(serde_json::from_str::<Value>(&body).is_err());
    }

    const BOUNDARY: &str = "tomato-test-boundary";

    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    /// A well-formed one-page PDF with no text on the page.
    fn blank_pdf() -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>",
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>",
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << >> >>",
        ];
        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{object}\nendobj\n", i + 1));
        }
        let xref = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.into_bytes()
    }

    async fn upload(app: &Router, uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> (StatusCode, String) {
        send_raw(
            app,
            uri,
            &format!("multipart/form-data; boundary={BOUNDARY}"),
            multipart_body(parts),
        )
        .await
    }

    #[tokio::test]
    async fn test_upload_without_file_part_is_missing_input() {
        let llm = Arc::new(FakeCompletion::replying(["unused"]));
        let app = app(llm.clone());

        let (status, body) = upload(
            &app,
            "/api/analyze-resume/upload",
            &[("jobDescription", None, b"Backend engineer".as_slice())],
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = parse(&body);
        assert_eq!(body["code"], "MISSING_INPUT");
        assert_eq!(body["error"], "file is required");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_of_textless_pdf_is_insufficient_content() {
        let llm = Arc::new(FakeCompletion::replying(["unused"]));
        let app = app(llm.clone());
        let pdf = blank_pdf();

        let (status, body) = upload(
            &app,
            "/api/analyze-resume/upload",
            &[("file", Some("scan.pdf"), pdf.as_slice())],
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(parse(&body)["code"], "INSUFFICIENT_CONTENT");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_of_non_pdf_is_unreadable() {
        let llm = Arc::new(FakeCompletion::replying(["unused"]));
        let app = app(llm.clone());

        let (status, body) = upload(
            &app,
            "/api/analyze-resume/upload",
            &[("file", Some("resume.pdf"), b"this is not a pdf".as_slice())],
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(parse(&body)["code"], "UNREADABLE_DOCUMENT");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_extract_text_reports_textless_pdf_as_insufficient() {
        let app = app(Arc::new(FakeCompletion::default()));
        let pdf = blank_pdf();

        let (status, body) = upload(&app, "/api/extract-text", &[("file", Some("scan.pdf"), pdf.as_slice())]).await;
        assert_eq!(status, StatusCode::OK);
        let body = parse(&body);
        assert_eq!(body["characters"], 0);
        assert_eq!(body["sufficient"], false);
    }

    #[tokio::test]
    async fn test_upload_without_multipart_content_type_uses_error_envelope() {
        let app = app(Arc::new(FakeCompletion::default()));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/analyze-resume/upload",
            Some(json!({"text": "not an upload"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["code"], "VALIDATION_ERROR");
    }
}
