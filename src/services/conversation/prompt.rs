//! Prompt assembly from the rolling chat history
//!
//! The prompt is the system preamble followed by one block per earlier turn
//! and a final open block holding the new question:
//!
//! ```text
//! <preamble>
//! User: <q1>
//! AI: <a1>
//!
//! User: <q>
//! AI:
//! ```

use crate::types::Turn;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for Software Engineers. \
Answer the questions as accurately as possible. \
Keep your answers concise and to the point. \
Answer in markdown format.";

/// Label that opens an answer; the generator continues after it.
pub const ANSWER_MARKER: &str = "AI:";

/// Label that opens a question.
pub const QUESTION_MARKER: &str = "User:";

/// Characters per token used by [`estimate_tokens`].
const CHARS_PER_TOKEN: usize = 4;

/// Builds the prompt from the full history with no size limit.
pub fn build_prompt(history: &[Turn], new_question: &str) -> String {
    assemble(SYSTEM_PROMPT, history, new_question)
}

/// Rough token count: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

fn turn_block(turn: &Turn) -> String {
    format!("{} {}\n{} {}\n", QUESTION_MARKER, turn.question, ANSWER_MARKER, turn.answer)
}

fn question_block(question: &str) -> String {
    format!("{} {}\n{}", QUESTION_MARKER, question, ANSWER_MARKER)
}

fn assemble(system_prompt: &str, history: &[Turn], new_question: &str) -> String {
    let mut blocks: Vec<String> = history.iter().map(turn_block).collect();
    blocks.push(question_block(new_question));
    format!("{}\n{}", system_prompt, blocks.join("\n"))
}

/// Prompt builder with a sliding window over the history.
///
/// The oldest turns are dropped until the estimated size of the whole prompt
/// fits `token_budget`. The preamble and the new question are always kept.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
    token_budget: usize,
}

impl PromptBuilder {
    pub fn new(token_budget: usize) -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            token_budget,
        }
    }

    /// Index of the first history turn that fits in the budget.
    pub fn window_start(&self, history: &[Turn], new_question: &str) -> usize {
        // Preamble newline plus the open question block
        let fixed = estimate_tokens(&self.system_prompt)
            + estimate_tokens("\n")
            + estimate_tokens(&question_block(new_question));

        let mut used = fixed;
        let mut start = history.len();
        for (idx, turn) in history.iter().enumerate().rev() {
            // Block text plus the joining newline
            let cost = estimate_tokens(&turn_block(turn)) + 1;
            if used + cost > self.token_budget {
                break;
            }
            used += cost;
            start = idx;
        }
        start
    }

    /// The turns that make it into the prompt, oldest first.
    pub fn window<'a>(&self, history: &'a [Turn], new_question: &str) -> &'a [Turn] {
        &history[self.window_start(history, new_question)..]
    }

    pub fn build(&self, history: &[Turn], new_question: &str) -> String {
        let window = self.window(history, new_question);
        if window.len() < history.len() {
            tracing::debug!(
                "[PROMPT] Dropped {} oldest turn(s) to fit {} token budget",
                history.len() - window.len(),
                self.token_budget
            );
        }
        assemble(&self.system_prompt, window, new_question)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(2048)
    }
}
