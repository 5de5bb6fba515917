// All LLM prompt constants for the resume pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume analysis. Pins the exact JSON schema and enumerations.
pub const ANALYSIS_SYSTEM: &str = r#"You are an expert resume reviewer and ATS (applicant tracking system) specialist.
Analyze the resume you are given and return ONLY a JSON object with this EXACT schema:
{
  "score": 0-100 integer,
  "summary": "two or three sentence overall assessment",
  "strengths": ["..."],
  "weaknesses": [
    {"issue": "...", "location": "section or line", "suggestion": "...", "impact": "High" | "Medium" | "Low"}
  ],
  "missingKeywords": ["..."],
  "improvementTips": ["..."],
  "atsCompatibility": 0-100 integer,
  "grammarAndStyleScore": 0-100 integer,
  "experienceRelevanceScore": 0-100 integer,
  "suggestedRoles": ["..."],
  "layoutSuggestions": ["..."],
  "grammarIssues": [
    {"issue": "...", "location": "...", "originalText": "...", "correctedText": "...", "explanation": "..."}
  ],
  "ats100Checklist": ["concrete step needed to reach a 100 ATS score"]
}
Use exactly these field names. "impact" must be one of "High", "Medium", "Low".
All scores are whole numbers between 0 and 100."#;

/// Analysis prompt template. Replace `{job_section}` and `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"{job_section}

RESUME:
{resume_text}"#;

/// Used when a job description accompanies the resume. Replace `{job_description}`.
pub const JOB_FIT_SECTION_TEMPLATE: &str = r#"Evaluate this resume specifically for fit against the job description below.
Scores, missing keywords, weaknesses and suggested roles must all be judged against THIS role.

JOB DESCRIPTION:
{job_description}"#;

/// Used when no job description is given.
pub const GENERAL_SECTION: &str = "Evaluate this resume on general quality, clarity, impact and ATS readiness \
    for the roles it most naturally targets.";

/// System prompt for resume optimization. Output is shown verbatim.
pub const OPTIMIZE_SYSTEM: &str = "You are an expert resume writer. \
    Rewrite resumes so they are tailored to a target job while staying truthful: \
    never invent employers, titles, dates, degrees or metrics that are not in the original. \
    Keep a clean, ATS-friendly plain text layout with clear section headings.";

/// Optimization prompt template. Replace `{job_description}` and `{resume_text}`.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Rewrite the resume below so it is optimized for the job description.

Rules:
1. Mirror the job description's key terms where the candidate's experience supports them
2. Lead each bullet with a strong action verb and keep quantified results
3. Reorder sections and bullets so the most relevant experience comes first
4. Do NOT add experience, skills or numbers that the original resume does not support

JOB DESCRIPTION:
{job_description}

ORIGINAL RESUME:
{resume_text}"#;
