//! Resume optimization. Rewrites a resume for a target job. The model reply is returned
//! verbatim; there is no parsing step.

use tracing::info;

use crate::llm_client::prompts::{fill_template, PLAIN_OUTPUT_INSTRUCTION};
use crate::llm_client::{ChatCompletion, CompletionRequest};
use crate::resume::prompts::{OPTIMIZE_PROMPT_TEMPLATE, OPTIMIZE_SYSTEM};
use crate::resume::{non_blank, ResumeError};

pub const OPTIMIZE_TEMPERATURE: f32 = 0.4;

/// Both inputs are required. Blank input fails with `MissingInput` and no network call.
pub async fn optimize_resume(
    llm: &dyn ChatCompletion,
    resume_text: &str,
    job_description: &str,
) -> Result<String, ResumeError> {
    let resume_text = non_blank(Some(resume_text)).ok_or(ResumeError::MissingInput("text"))?;
    let job_description =
        non_blank(Some(job_description)).ok_or(ResumeError::MissingInput("jobDescription"))?;

    let prompt = fill_template(
        OPTIMIZE_PROMPT_TEMPLATE,
        &[("job_description", job_description), ("resume_text", resume_text)],
    );
    let system = format!("{OPTIMIZE_SYSTEM} {PLAIN_OUTPUT_INSTRUCTION}");
    let request = CompletionRequest::prompt(&system, prompt, OPTIMIZE_TEMPERATURE);

    let optimized = llm.complete(request).await?;
    info!("Resume optimized: {} characters", optimized.chars().count());
    Ok(optimized)
}
