//! Axum route handlers for the generation endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::generator::{
    generate_content, generate_prompt, generate_resume, summarize, ResumeForm, SummaryLength,
};
use crate::routes::extract::AppJson;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GeneratePromptRequest {
    #[serde(default)]
    pub idea: Option<String>,
    pub category: Option<String>,
    pub tone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub length: SummaryLength,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(default)]
    pub topic: Option<String>,
    pub content_type: Option<String>,
    pub tone: Option<String>,
    pub length: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub resume: String,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-resume
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    AppJson(form): AppJson<ResumeForm>,
) -> Result<Json<ResumeResponse>, AppError> {
    let resume = generate_resume(state.llm.as_ref(), &form).await?;
    Ok(Json(ResumeResponse { resume }))
}

/// POST /api/generate-prompt
pub async fn handle_generate_prompt(
    State(state): State<AppState>,
    AppJson(request): AppJson<GeneratePromptRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    let prompt = generate_prompt(
        state.llm.as_ref(),
        request.idea.as_deref().unwrap_or_default(),
        request.category.as_deref(),
        request.tone.as_deref(),
    )
    .await?;
    Ok(Json(PromptResponse { prompt }))
}

/// POST /api/summarize
pub async fn handle_summarize(
    State(state): State<AppState>,
    AppJson(request): AppJson<SummarizeRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary = summarize(
        state.llm.as_ref(),
        request.text.as_deref().unwrap_or_default(),
        request.length,
    ).await?;
    Ok(Json(SummaryResponse { summary }))
}

/// POST /api/generate-content
pub async fn handle_generate_content(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateContentRequest>,
) -> Result<Json<ContentResponse>, AppError> {
    let content = generate_content(
        state.llm.as_ref(),
        request.topic.as_deref().unwrap_or_default(),
        request.content_type.as_deref(),
        request.tone.as_deref(),
        request.length.as_deref(),
    )
    .await?;
    Ok(Json(ContentResponse { content }))
}
