use deepread_core::types::ScoredResult;

const BASE_PROMPT: &str = "You are a helpful AI assistant.";
const CONTEXT_PROMPT: &str =
    "You are a helpful AI assistant analyzing documents. Use the following document context to answer questions:";

/// Joins ranked passages into a prompt block, each prefixed with its source.
/// `None` when there is nothing to add.
pub fn build_context(results: &[ScoredResult]) -> Option<String> {
    if results.is_empty() {
        return None;
    }
    let blocks: Vec<String> = results
        .iter()
        .map(|r| format!("[Document: {}]\n{}", r.filename, r.text))
        .collect();
    Some(blocks.join("\n\n"))
}

pub fn system_prompt(context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.trim().is_empty() => format!("{}\n\n{}\n\n", CONTEXT_PROMPT, ctx),
        _ => BASE_PROMPT.to_string(),
    }
}
