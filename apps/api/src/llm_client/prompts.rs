// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Fragment for endpoints whose output is shown to the user as-is.
pub const PLAIN_OUTPUT_INSTRUCTION: &str = "Respond with the requested content only. \
    Do NOT add a preamble, closing remarks, or commentary about what you did.";

/// Fills `{name}` placeholders in a single pass over `template`. Inserted values are not
/// scanned again, so user text that happens to contain `{resume_text}` or similar is kept
/// as written. Braces that do not name a value are left alone.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let value = after
            .find('}')
            .map(|end| &after[..end])
            .and_then(|name| values.iter().find(|(key, _)| *key == name));
        match value {
            Some((key, value)) => {
                out.push_str(value);
                rest = &after[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
