use axum::Json;
use serde::{Deserialize, Serialize};

use crate::render::render_markdown;
use crate::routes::extract::AppJson;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub markdown: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
}

/// POST /api/render-markdown
pub async fn handle_render_markdown(
    AppJson(request): AppJson<RenderRequest>,
) -> Json<RenderResponse> {
    Json(RenderResponse {
        html: render_markdown(request.markdown.as_deref().unwrap_or_default()),
    })
}
