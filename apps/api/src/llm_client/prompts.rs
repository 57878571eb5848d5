// Shared prompt fragments used by every JSON-mode generation call.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Copy rules appended to every page-writing prompt.
pub const MOBILE_COPY_INSTRUCTION: &str = "\
    Write for a mobile long-scroll page: short, punchy sentences and liberal use of bullet points. \
    Lead with the customer's benefit, never with a bare specification. \
    Do NOT invent certifications, clinical results or statistics that the seller did not provide; \
    where data is missing, use cautious, general wording instead.";
