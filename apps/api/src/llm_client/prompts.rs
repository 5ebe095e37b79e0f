// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction shared by every extraction prompt.
pub const FAITHFUL_EXTRACTION: &str = "\
    CRITICAL: Extract ONLY information explicitly stated in the provided text. \
    Do NOT generate, invent, or assume anything. \
    If a field is not present, use an empty string, null, or an empty list. \
    Never produce sample data such as 'John Doe' or placeholder emails.";

/// Joins a role description with the JSON-only rule into a system prompt.
pub fn system_prompt(role: &str) -> String {
    format!("{role}\n\n{JSON_ONLY_SYSTEM}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_appends_json_rule() {
        let prompt = system_prompt("You parse things.");
        assert!(prompt.starts_with("You parse things."));
        assert!(prompt.ends_with(JSON_ONLY_SYSTEM));
    }
}
