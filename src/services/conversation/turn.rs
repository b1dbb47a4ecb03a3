//! One question/answer exchange

use super::answer::extract_answer;
use super::prompt::PromptBuilder;
use crate::services::ml::MLService;
use crate::types::{ChatHistory, GenerationError, GenerationSettings, Turn};
use std::time::Instant;

/// Stored as the answer when generation fails.
pub const ERROR_ANSWER_FALLBACK: &str = "Sorry, an error occurred while generating the response.";

/// What the UI needs after a turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub turn: Turn,
    pub error: Option<GenerationError>,
}

impl TurnOutcome {
    /// Message shown to the user when generation failed.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| format!("Generation error: {}", e))
    }
}

/// Runs one turn and appends exactly one complete entry to `history`.
///
/// Failures are not retried: the error fallback is stored as the answer and
/// the error is handed back for display.
pub async fn run_turn(
    ml: &MLService,
    prompts: &PromptBuilder,
    history: &mut ChatHistory,
    question: &str,
    settings: &GenerationSettings,
) -> TurnOutcome {
    let started = Instant::now();
    let prompt = prompts.build(history.turns(), question);
    tracing::debug!(
        "[TURN] Prompt built: {} chars from {} prior turn(s)",
        prompt.len(),
        history.len()
    );

    let (answer, error) = match ml.generate(prompt.clone(), settings).await {
        Ok(result) => (extract_answer(&result.generated_text, &prompt), None),
        Err(e) => {
            tracing::error!(
                "[TURN] Generation failed ({}, retryable={}): {}",
                e.kind(),
                e.is_retryable(),
                e
            );
            (ERROR_ANSWER_FALLBACK.to_string(), Some(e))
        }
    };

    let turn = Turn::new(question.to_string(), answer);
    history.push_turn(turn.clone());
    tracing::info!(
        "[TURN] Completed in {:?} (history now {} turns)",
        started.elapsed(),
        history.len()
    );

    TurnOutcome { turn, error }
}
