//! Tolerant parser for raw completion text.
//!
//! Completions are expected to follow the Thought/Action/Action Input
//! grammar and terminate in `Final Answer:`, but the service is free-form
//! text and the grammar is regularly violated. Parsing therefore never
//! fails: anything that matches neither branch comes back as `Malformed`
//! and the loop decides what to do with it.

/// Parsed form of one completion.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedCompletion {
    FinalAnswer(String),
    Action { thought: String, tool: String, input: String },
    Malformed(String),
}

const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const ACTION_MARKER: &str = "Action:";
const ACTION_INPUT_MARKER: &str = "Action Input:";

pub fn parse_completion(text: &str) -> ParsedCompletion {
    // A final answer wins even when action lines are also present.
    if let Some(index) = text.find(FINAL_ANSWER_MARKER) {
        let answer = text[index + FINAL_ANSWER_MARKER.len()..].trim();
        return ParsedCompletion::FinalAnswer(answer.to_string());
    }

    let Some(action_start) = text.find(ACTION_MARKER) else {
        return ParsedCompletion::Malformed(text.to_string());
    };

    let after_action = &text[action_start + ACTION_MARKER.len()..];
    let Some(input_marker) = after_action.find(ACTION_INPUT_MARKER) else {
        return ParsedCompletion::Malformed(text.to_string());
    };

    let tool = after_action[..input_marker].trim();
    if tool.is_empty() {
        return ParsedCompletion::Malformed(text.to_string());
    }

    let input = &after_action[input_marker + ACTION_INPUT_MARKER.len()..];

    ParsedCompletion::Action {
        thought: thought_before(text, action_start),
        tool: tool.to_string(),
        input: strip_wrapping(input),
    }
}

fn thought_before(text: &str, action_start: usize) -> String {
    let prefix = text[..action_start].trim();
    prefix.strip_prefix("Thought:").map(str::trim).unwrap_or(prefix).to_string()
}

/// Trim the action input and unwrap one layer of quoting the model tends to
/// add around SQL: a matched pair of double quotes or a ``` fence (with an
/// optional language tag).
fn strip_wrapping(value: &str) -> String {
    let trimmed = value.trim();

    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        return trimmed[1..trimmed.len() - 1].to_string();
    }

    if let Some(inner) = trimmed.strip_prefix("```").and_then(|rest| rest.strip_suffix("```")) {
        let without_tag = match inner.split_once('\n') {
            Some((first_line, rest))
                if first_line.chars().all(|ch| ch.is_ascii_alphanumeric()) =>
            {
                rest
            }
            _ => inner,
        };
        return without_tag.trim().to_string();
    }

    trimmed.to_string()
}
