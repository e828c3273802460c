//! Display formatting for tool results.
//!
//! Only affects what is shown; the history always keeps the full content.

/// Prefix some services put in front of tool output.
const TOOL_RESULT_PREFIX: &str = "Tool result: ";

/// Results at or beyond this many characters are truncated for display.
const TRUNCATE_AT: usize = 200;
const KEEP_CHARS: usize = 180;

/// Turn a raw tool result into markdown for the terminal renderer.
///
/// - strips a leading `Tool result: ` prefix
/// - truncates long results and closes them with a code fence
/// - pretty-prints a JSON object inside a `json` code block
/// - otherwise returns the text as-is (it is rendered as markdown)
pub fn format_tool_result(raw: &str) -> String {
    let mut result = raw.strip_prefix(TOOL_RESULT_PREFIX).unwrap_or(raw).to_string();

    if result.chars().count() >= TRUNCATE_AT {
        let kept: String = result.chars().take(KEEP_CHARS).collect();
        result = format!("{kept}... ```");
    }

    if result.contains("```") {
        return result;
    }

    let trimmed = result.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return format!("```json\n{pretty}\n```");
            }
        }
    }

    result
}

/// Shorten `text` to at most `max_chars` characters, appending `...` when
/// anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
