//! Search query and prompt construction.

/// Characters of the input text used to build the search query.
pub const SEARCH_QUERY_CHARS: usize = 200;

/// Substituted for an empty search result.
pub const NO_SEARCH_RESULTS: &str = "No external search results available.";

/// First `SEARCH_QUERY_CHARS` characters of `text` with every `\n` turned
/// into a space. Other whitespace is left alone.
pub fn search_query(text: &str) -> String {
    text.chars()
        .take(SEARCH_QUERY_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

/// The search context to embed, with the placeholder for an empty result.
pub fn context_or_placeholder(context: &str) -> &str {
    if context.is_empty() {
        NO_SEARCH_RESULTS
    } else {
        context
    }
}

/// Build the fact-checking prompt.
///
/// Deterministic: the same `text` and `search_context` always produce the
/// same prompt. Both are embedded verbatim; neither is escaped.
pub fn build_prompt(text: &str, search_context: &str) -> String {
    format!(
        r#"You are a fact-checker. Analyze the following text against the search context and respond ONLY with valid JSON.

INPUT TEXT:
"{text}"

SEARCH CONTEXT:
{search_context}

Respond with this exact JSON format (no markdown, no code blocks):
{{
    "verified": true or false,
    "percentage": 0-100,
    "analysis": "detailed explanation",
    "errors": ["list any false claims"],
    "summary": "brief summary"
}}"#
    )
}
