//! Generation pipeline: validate input → build prompt → one completion call → return text.
//!
//! None of these endpoints parse the reply. Whatever the model writes is returned as-is,
//! so the only failure modes are missing input and the provider errors.

use serde::Deserialize;
use tracing::info;

use crate::generation::prompts::{
    CONTENT_PROMPT_TEMPLATE, CONTENT_SYSTEM, PROMPT_ENGINEER_SYSTEM, PROMPT_ENGINEER_TEMPLATE,
    RESUME_PROMPT_TEMPLATE, RESUME_SYSTEM, SUMMARIZE_PROMPT_TEMPLATE, SUMMARIZE_SYSTEM,
};
use crate::generation::GenerationError;
use crate::llm_client::prompts::{fill_template, PLAIN_OUTPUT_INSTRUCTION};
use crate::llm_client::{ChatCompletion, CompletionRequest};

pub const RESUME_TEMPERATURE: f32 = 0.4;
pub const PROMPT_TEMPERATURE: f32 = 0.7;
pub const SUMMARY_TEMPERATURE: f32 = 0.3;
pub const CONTENT_TEMPERATURE: f32 = 0.8;

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

/// The resume builder form. Only `name` is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeForm {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub target_role: Option<String>,
    pub summary: Option<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    fn instruction(self) -> &'static str {
        match self {
            SummaryLength::Short => "Keep it to two or three sentences.",
            SummaryLength::Medium => "Write one solid paragraph.",
            SummaryLength::Long => "Write a detailed summary of several paragraphs with key points.",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

/// Writes a Markdown resume from the builder form.
pub async fn generate_resume(
    llm: &dyn ChatCompletion,
    form: &ResumeForm,
) -> Result<String, GenerationError> {
    required(Some(form.name.as_str()), "name")?;
    let prompt = fill_template(RESUME_PROMPT_TEMPLATE, &[("form", render_form(form).as_str())]);
    let resume = complete_plain(llm, RESUME_SYSTEM, prompt, RESUME_TEMPERATURE).await?;
    info!("Resume generated: {} characters", resume.chars().count());
    Ok(resume)
}

/// Expands a rough idea into an engineered prompt.
pub async fn generate_prompt(
    llm: &dyn ChatCompletion,
    idea: &str,
    category: Option<&str>,
    tone: Option<&str>,
) -> Result<String, GenerationError> {
    let idea = required(Some(idea), "idea")?;
    let prompt = fill_template(
        PROMPT_ENGINEER_TEMPLATE,
        &[
            ("category", or_default(category, "general")),
            ("tone", or_default(tone, "professional")),
            ("idea", idea),
        ],
    );
    complete_plain(llm, PROMPT_ENGINEER_SYSTEM, prompt, PROMPT_TEMPERATURE).await
}

pub async fn summarize(
    llm: &dyn ChatCompletion,
    text: &str,
    length: SummaryLength,
) -> Result<String, GenerationError> {
    let text = required(Some(text), "text")?;
    let prompt = fill_template(
        SUMMARIZE_PROMPT_TEMPLATE,
        &[("length", length.instruction()), ("text", text)],
    );
    complete_plain(llm, SUMMARIZE_SYSTEM, prompt, SUMMARY_TEMPERATURE).await
}

pub async fn generate_content(
    llm: &dyn ChatCompletion,
    topic: &str,
    content_type: Option<&str>,
    tone: Option<&str>,
    length: Option<&str>,
) -> Result<String, GenerationError> {
    let topic = required(Some(topic), "topic")?;
    let prompt = fill_template(
        CONTENT_PROMPT_TEMPLATE,
        &[
            ("content_type", or_default(content_type, "blog post")),
            ("tone", or_default(tone, "informative")),
            ("length", or_default(length, "medium")),
            ("topic", topic),
        ],
    );
    complete_plain(llm, CONTENT_SYSTEM, prompt, CONTENT_TEMPERATURE).await
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn complete_plain(
    llm: &dyn ChatCompletion,
    system: &str,
    prompt: String,
    temperature: f32,
) -> Result<String, GenerationError> {
    let system = format!("{system} {PLAIN_OUTPUT_INSTRUCTION}");
    let request = CompletionRequest::prompt(&system, prompt, temperature);
    Ok(llm.complete(request).await?)
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, GenerationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(GenerationError::MissingInput(field))
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default)
}

/// Renders the form as labelled plain text. Empty fields and sections are skipped.
fn render_form(form: &ResumeForm) -> String {
    let mut out = format!("Name: {}\n", form.name.trim());
    let contact = [
        ("Email", &form.email),
        ("Phone", &form.phone),
        ("Location", &form.location),
        ("LinkedIn", &form.linkedin),
        ("Target role", &form.target_role),
    ];
    for (label, value) in contact {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            out.push_str(&format!("{label}: {v}\n"));
        }
    }
    if let Some(summary) = form.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str(&format!("\nSUMMARY:\n{}\n", summary.trim()));
    }

    if !form.experience.is_empty() {
        out.push_str("\nEXPERIENCE:\n");
        for e in &form.experience {
            out.push_str(&format!(
                "- {} at {} ({} to {})\n  {}\n",
                e.title,
                e.company,
                e.start_date,
                or_default(Some(e.end_date.as_str()), "present"),
                e.description
            ));
        }
    }
    if !form.education.is_empty() {
        out.push_str("\nEDUCATION:\n");
        for e in &form.education {
            out.push_str(&format!("- {}, {} ({})\n", e.degree, e.institution, e.year));
        }
    }
    if !form.skills.is_empty() {
        out.push_str(&format!("\nSKILLS: {}\n", form.skills.join(", ")));
    }
    if !form.projects.is_empty() {
        out.push_str("\nPROJECTS:\n");
        for p in &form.projects {
            out.push_str(&format!("- {}: {}", p.name, p.description));
            if !p.technologies.is_empty() {
                out.push_str(&format!(" [{}]", p.technologies.join(", ")));
            }
            out.push('\n');
        }
    }
    out
}
