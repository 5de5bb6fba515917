//! Resume analysis. Turns resume text (and an optional job description) into an
//! `AnalysisResult` by delegating to the LLM.
//!
//! Single attempt, no caching. A reply that does not parse into a complete, in-range
//! `AnalysisResult` fails the whole operation.

use tracing::info;

use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{complete_json, ChatCompletion, CompletionRequest, LlmError};
use crate::models::analysis::AnalysisResult;
use crate::resume::pdf::ensure_sufficient_content;
use crate::resume::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, GENERAL_SECTION, JOB_FIT_SECTION_TEMPLATE,
};
use crate::resume::{non_blank, ResumeError};

/// Low temperature favours stable scores across resubmissions.
pub const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Analyzes resume text. A blank job description is treated as absent.
pub async fn analyze_resume(
    llm: &dyn ChatCompletion,
    resume_text: &str,
    job_description: Option<&str>,
) -> Result<AnalysisResult, ResumeError> {
    let resume_text = non_blank(Some(resume_text)).ok_or(ResumeError::MissingInput("text"))?;
    let job_description = non_blank(job_description);

    let prompt = build_analysis_prompt(resume_text, job_description);
    let system = format!("{ANALYSIS_SYSTEM}\n{JSON_ONLY_INSTRUCTION}");
    let request = CompletionRequest::prompt(&system, prompt, ANALYSIS_TEMPERATURE);

    let result: AnalysisResult = complete_json(llm, request).await?;
    result.validate().map_err(LlmError::MalformedResponse)?;

    info!(
        "Resume analysis complete: score={}, ats={}, targeted={}",
        result.score,
        result.ats_compatibility,
        job_description.is_some()
    );
    Ok(result)
}

/// Analyzes text that came out of the PDF extractor, refusing near-empty documents
/// before any network call is made.
pub async fn analyze_extracted(
    llm: &dyn ChatCompletion,
    extracted_text: &str,
    job_description: Option<&str>,
) -> Result<AnalysisResult, ResumeError> {
    ensure_sufficient_content(extracted_text)?;
    analyze_resume(llm, extracted_text, job_description).await
}

fn build_analysis_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let job_section = match job_description {
        Some(jd) => fill_template(JOB_FIT_SECTION_TEMPLATE, &[("job_description", jd)]),
        None => GENERAL_SECTION.to_string(),
    };
    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[("job_section", job_section.as_str()), ("resume_text", resume_text)],
    )
}
