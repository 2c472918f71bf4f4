// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file only holds the pieces they have in common.

/// Appended to any instruction whose answer is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str =
    "return ONLY valid JSON (no markdown, no code blocks, just pure JSON)";
