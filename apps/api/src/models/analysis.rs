//! Structured resume analysis returned by the AI analysis client.
//!
//! Field names follow the camelCase JSON schema the model is instructed to emit.
//! Every required field must be present in the model output; nothing is defaulted.

use serde::{Deserialize, Serialize};

/// Severity the model assigns to a weakness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub issue: String,
    pub location: String,
    pub suggestion: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarIssue {
    pub issue: String,
    pub location: String,
    pub original_text: String,
    pub corrected_text: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0 – 100
    pub score: u32,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<Weakness>,
    pub missing_keywords: Vec<String>,
    pub improvement_tips: Vec<String>,
    /// 0 – 100
    pub ats_compatibility: u32,
    /// 0 – 100
    pub grammar_and_style_score: u32,
    /// 0 – 100
    pub experience_relevance_score: u32,
    pub suggested_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar_issues: Option<Vec<GrammarIssue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ats100_checklist: Option<Vec<String>>,
}

impl AnalysisResult {
    /// Rejects scores outside 0 – 100. Out-of-range values are never clamped.
    pub fn validate(&self) -> Result<(), String> {
        let scores = [
            ("score", self.score),
            ("atsCompatibility", self.ats_compatibility),
            ("grammarAndStyleScore", self.grammar_and_style_score),
            ("experienceRelevanceScore", self.experience_relevance_score),
        ];
        for (field, value) in scores {
            if value > 100 {
                return Err(format!("{field} must be between 0 and 100, got {value}"));
            }
        }
        Ok(())
    }
}

/// A complete, schema-valid analysis used across unit tests.
#[cfg(test)]
pub(crate) const SAMPLE_ANALYSIS_JSON: &str = r#"{
    "score": 78,
    "summary": "Solid backend engineer resume with clear impact statements.",
    "strengths": ["Quantified achievements", "Relevant Rust experience"],
    "weaknesses": [
        {
            "issue": "Summary is generic",
            "location": "Professional Summary",
            "suggestion": "Lead with your strongest systems project",
            "impact": "Medium"
        }
    ],
    "missingKeywords": ["Kubernetes", "gRPC"],
    "improvementTips": ["Add a skills matrix"],
    "atsCompatibility": 85,
    "grammarAndStyleScore": 90,
    "experienceRelevanceScore": 72,
    "suggestedRoles": ["Backend Engineer", "Platform Engineer"],
    "grammarIssues": [
        {
            "issue": "Tense mismatch",
            "location": "Experience, bullet 2",
            "originalText": "Lead a team of four",
            "correctedText": "Led a team of four",
            "explanation": "Past roles use past tense"
        }
    ]
}"#;
