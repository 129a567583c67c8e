//! Recovering JSON from model output.
//!
//! Models like to wrap JSON in a markdown code block and sprinkle
//! `// comments` over it. [`extract_json_from_markdown`] strips both so the
//! result can be handed to `serde_json`.

use serde_json::Value;

use crate::errors::{BotError, BotResult};

const FENCE: &str = "```";
const COMMENT: &str = "//";

/// Strip markdown fencing and inline `//` comments.
///
/// Never fails; whether the result is valid JSON is the caller's concern.
///
/// Known limitation: comment stripping does not understand string literals,
/// so a `//` inside a JSON string (a URL, say) truncates the line and
/// leaves invalid JSON behind.
pub fn extract_json_from_markdown(text: &str) -> String {
    let mut lines: Vec<&str> = text.trim().split('\n').collect();

    // Opening fence, with or without a language tag.
    if lines
        .first()
        .is_some_and(|line| line.trim().starts_with(FENCE))
    {
        lines.remove(0);
    }

    if lines.last().is_some_and(|line| line.trim() == FENCE) {
        lines.pop();
    }

    let cleaned: Vec<&str> = lines
        .into_iter()
        .map(|line| line.find(COMMENT).map_or(line, |idx| &line[..idx]))
        .collect();

    cleaned.join("\n").trim().to_string()
}

/// Extract and parse model output as JSON.
pub fn parse_model_json(raw: &str) -> BotResult<Value> {
    let clean = extract_json_from_markdown(raw);
    serde_json::from_str(&clean).map_err(|e| BotError::JsonDecode {
        reason: e.to_string(),
    })
}
