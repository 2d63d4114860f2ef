// Shared prompt fragments.
// Each stage that calls the model defines its own prompts alongside it
// (see pipeline/prompts.rs). This file contains cross-cutting fragments.

/// Appended to every system prompt: the response must be one JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Extraction must never invent facts that are not in the source text.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Extract ONLY information present in the resume text. \
    If a field is absent, use null for single values and an empty list for lists. \
    Never fabricate names, contact details, employers, dates, or credentials.";

/// Synthesized content must stay within the candidate's demonstrated range.
pub const PLAUSIBILITY_INSTRUCTION: &str = "\
    CRITICAL: Everything you generate must be a plausible extension of the candidate's \
    demonstrated background. Stay at or near their experience level and technology stack. \
    Do NOT duplicate their existing work experience as a project.";

/// Joins a stage-specific system prompt with the JSON-only fragment.
pub fn with_json_only(system: &str) -> String {
    format!("{system}\n\n{JSON_ONLY_INSTRUCTION}")
}
