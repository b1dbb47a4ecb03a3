use super::generator::TextGenerator;
use crate::types::{GenerationError, GenerationRequest, GenerationResult};

/// Generator for running the UI without model weights.
///
/// Echoes back a canned answer after the prompt, the same shape a real
/// text-generation pipeline returns.
pub struct StubGenerator {
    calls: usize,
}

impl StubGenerator {
    pub const EOS_TOKEN_ID: u32 = 0;

    pub fn new() -> Self {
        tracing::info!("📦 Creating stub generator (no model loaded)");
        Self { calls: 0 }
    }

    fn canned_answer(&self, prompt: &str) -> String {
        let question = prompt
            .rsplit_once("User:")
            .map(|(_, rest)| rest.trim_end_matches("AI:").trim())
            .unwrap_or("")
            .chars()
            .take(80)
            .collect::<String>();

        format!(
            "This is a **stub** response to: *{}*. \
             The server is running without a model; set `MODEL_PATH` and `TOKENIZER_PATH` \
             and unset `STUB_MODE` to get real answers.",
            question
        )
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextGenerator for StubGenerator {
    fn eos_token_id(&self) -> u32 {
        Self::EOS_TOKEN_ID
    }

    fn generate(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<Vec<GenerationResult>, GenerationError> {
        self.calls += 1;
        tracing::debug!("🎯 Stub generation #{}", self.calls);

        let answer = self.canned_answer(&request.prompt);
        let result = GenerationResult::new(format!("{} {}", request.prompt, answer));
        Ok(vec![result; request.num_return_sequences.max(1)])
    }

    fn name(&self) -> &str {
        "stub"
    }
}
