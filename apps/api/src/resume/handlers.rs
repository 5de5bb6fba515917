//! Axum route handlers for the resume API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::resume::analyzer::{analyze_extracted, analyze_resume};
use crate::resume::optimizer::optimize_resume;
use crate::resume::pdf::{extract_text, MIN_RESUME_CHARS};
use crate::resume::ResumeError;
use crate::routes::extract::AppJson;
use crate::routes::UserIdQuery;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub optimized_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
    pub characters: usize,
    /// Whether the text meets the minimum length for analysis.
    pub sufficient: bool,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: Option<Value>,
}

#[derive(Debug, Default)]
struct Upload {
    file: Option<Bytes>,
    job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-resume
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = analyze_resume(
        state.llm.as_ref(),
        request.text.as_deref().unwrap_or_default(),
        request.job_description.as_deref(),
    )
    .await?;
    Ok(Json(result))
}

/// POST /api/analyze-resume/upload
///
/// Multipart: `file` (PDF, required) and `jobDescription` (optional).
/// Near-empty extractions are rejected before the LLM is called.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let upload = read_upload(multipart?).await?;
    let file = upload.file.ok_or(ResumeError::MissingInput("file"))?;

    let text = extract_text(file).await.map_err(ResumeError::from)?;
    let result = analyze_extracted(
        state.llm.as_ref(),
        &text,
        upload.job_description.as_deref(),
    )
    .await?;
    Ok(Json(result))
}

/// POST /api/extract-text
///
/// Returns the extracted text without judging it; `sufficient` tells the caller
/// whether analysis would accept it.
pub async fn handle_extract_text(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractTextResponse>, AppError> {
    let upload = read_upload(multipart?).await?;
    let file = upload.file.ok_or(ResumeError::MissingInput("file"))?;

    let text = extract_text(file).await.map_err(ResumeError::from)?;
    let characters = text.chars().count();
    Ok(Json(ExtractTextResponse {
        text,
        characters,
        sufficient: characters >= MIN_RESUME_CHARS,
    }))
}

/// POST /api/optimize-resume
pub async fn handle_optimize(
    State(state): State<AppState>,
    AppJson(request): AppJson<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let optimized_text = optimize_resume(
        state.llm.as_ref(),
        request.text.as_deref().unwrap_or_default(),
        request.job_description.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok(Json(OptimizeResponse { optimized_text }))
}

/// GET /api/resume-draft
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DraftResponse>, AppError> {
    let draft = state.drafts.load(params.user_id()?).await?;
    Ok(Json(DraftResponse { draft }))
}

/// PUT /api/resume-draft
pub async fn handle_put_draft(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    AppJson(draft): AppJson<Value>,
) -> Result<StatusCode, AppError> {
    if !draft.is_object() {
        return Err(AppError::Validation(
            "draft must be a JSON object".to_string(),
        ));
    }
    state.drafts.save(params.user_id()?, &draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/resume-draft
pub async fn handle_delete_draft(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    state.drafts.delete(params.user_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reads the `file` and `jobDescription` parts. Unknown parts are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                upload.file = Some(bytes);
            }
            Some("jobDescription") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid jobDescription: {e}")))?;
                upload.job_description = Some(text);
            }
            _ => {}
        }
    }
    Ok(upload)
}
