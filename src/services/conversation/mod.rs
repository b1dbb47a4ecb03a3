//! Prompt construction, answer extraction and the turn loop

pub mod answer;
pub mod prompt;
pub mod turn;

pub use answer::{extract_answer, EMPTY_ANSWER_FALLBACK};
pub use prompt::{build_prompt, PromptBuilder, ANSWER_MARKER, SYSTEM_PROMPT};
pub use turn::{run_turn, TurnOutcome, ERROR_ANSWER_FALLBACK};
