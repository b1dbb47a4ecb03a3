//! Answer extraction from raw generator output

use super::prompt::ANSWER_MARKER;

/// Shown when nothing usable is left after extraction.
pub const EMPTY_ANSWER_FALLBACK: &str = "Sorry, I couldn't generate a response.";

/// Pulls the assistant answer out of `raw_text`.
///
/// With the marker present, everything after its last occurrence is the
/// answer. Otherwise the prompt is cut out of the text. Never returns an
/// empty string.
///
/// Generator output with no text at all never reaches this point:
/// `MLService::generate` reports it as `MalformedOutput`.
pub fn extract_answer(raw_text: &str, prompt: &str) -> String {
    let answer = match raw_text.rsplit_once(ANSWER_MARKER) {
        Some((_, after)) => after.trim().to_string(),
        None if prompt.is_empty() => raw_text.trim().to_string(),
        None => raw_text.replace(prompt, "").trim().to_string(),
    };

    if answer.is_empty() {
        tracing::debug!("[EXTRACT] Nothing left after extraction, using fallback");
        EMPTY_ANSWER_FALLBACK.to_string()
    } else {
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::conversation::prompt::build_prompt;

    #[test]
    fn test_marker_split() {
        let prompt = build_prompt(&[], "What is a hash map?");
        let raw = format!("{} A hash map is a data structure.", prompt);
        assert_eq!(extract_answer(&raw, &prompt), "A hash map is a data structure.");
    }

    #[test]
    fn test_last_marker_wins() {
        let raw = "User: a\nAI: first\nUser: b\nAI:   second answer \n";
        assert_eq!(extract_answer(raw, "unrelated"), "second answer");
    }

    #[test]
    fn test_fallback_strips_prompt() {
        let prompt = "Tell me about stacks";
        let raw = "Tell me about stacks  LIFO containers.  ";
        assert_eq!(extract_answer(raw, prompt), "LIFO containers.");
    }

    #[test]
    fn test_raw_equal_to_prompt_gives_apology() {
        let prompt = "no marker in here";
        assert_eq!(extract_answer(prompt, prompt), EMPTY_ANSWER_FALLBACK);
    }

    #[test]
    fn test_marker_with_nothing_after() {
        let raw = "User: hello\nAI:   \n";
        assert_eq!(extract_answer(raw, "whatever"), EMPTY_ANSWER_FALLBACK);
    }

    #[test]
    fn test_no_marker_no_prompt_match() {
        assert_eq!(extract_answer("  plain text  ", "prompt"), "plain text");
        assert_eq!(extract_answer("", "prompt"), EMPTY_ANSWER_FALLBACK);
    }
}
