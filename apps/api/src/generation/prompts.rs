// Prompt constants for the generation endpoints.
// Placeholders in braces are replaced before sending.

/// System prompt for the resume builder.
pub const RESUME_SYSTEM: &str = "You are a professional resume writer. \
    Write clear, achievement-focused resumes in Markdown. \
    Use a level-one heading for the candidate's name and level-two headings for sections. \
    Start experience bullets with strong action verbs and quantify results where the input allows. \
    Never invent employers, dates, degrees or metrics that are not in the input.";

/// Resume builder prompt. Replace `{form}` with the rendered form fields.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Write a complete, ATS-friendly resume from the following details.
Omit any section that has no content.

{form}"#;

/// System prompt for the prompt engineer.
pub const PROMPT_ENGINEER_SYSTEM: &str = "You are an expert prompt engineer. \
    Turn rough ideas into precise, well-structured prompts for large language models. \
    A good prompt states the role, the task, the context, constraints and the expected output format.";

/// Prompt-engineer prompt. Replace `{idea}`, `{category}` and `{tone}`.
pub const PROMPT_ENGINEER_TEMPLATE: &str = r#"Write an optimized prompt for the following idea.

Idea: {idea}
Category: {category}
Tone: {tone}

Return only the finished prompt, ready to paste into a chat assistant."#;

/// System prompt for the summarizer.
pub const SUMMARIZE_SYSTEM: &str = "You are an expert editor. \
    Summarize text faithfully, keeping key facts, names and numbers. \
    Do not add opinions or information that is not in the source.";

/// Summarizer prompt. Replace `{length}` and `{text}`.
pub const SUMMARIZE_PROMPT_TEMPLATE: &str = r#"Summarize the following text. {length}

TEXT:
{text}"#;

/// System prompt for the content writer.
pub const CONTENT_SYSTEM: &str = "You are a versatile content writer. \
    Write engaging, well-organized content in Markdown that matches the requested type and tone.";

/// Content-writer prompt. Replace `{topic}`, `{content_type}`, `{tone}` and `{length}`.
pub const CONTENT_PROMPT_TEMPLATE: &str = r#"Write a {content_type} about the following topic.

Topic: {topic}
Tone: {tone}
Length: {length}"#;
