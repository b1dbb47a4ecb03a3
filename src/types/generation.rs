//! Values passed across the generation boundary

use serde::{Deserialize, Serialize};

pub const MIN_NEW_TOKENS: usize = 50;
pub const MAX_NEW_TOKENS: usize = 1000;
pub const NEW_TOKENS_STEP: usize = 50;

pub const MIN_TEMPERATURE: f64 = 0.1;
pub const MAX_TEMPERATURE: f64 = 1.0;
pub const TEMPERATURE_STEP: f64 = 0.1;

/// Per-turn knobs exposed by the sidebar sliders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub max_new_tokens: usize,
    pub temperature: f64,
}

impl GenerationSettings {
    pub fn new(max_new_tokens: usize, temperature: f64) -> Result<Self, String> {
        let settings = Self {
            max_new_tokens,
            temperature,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the values against the slider ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_NEW_TOKENS..=MAX_NEW_TOKENS).contains(&self.max_new_tokens) {
            return Err(format!(
                "max_new_tokens must be between {} and {}, got {}",
                MIN_NEW_TOKENS, MAX_NEW_TOKENS, self.max_new_tokens
            ));
        }
        // Small epsilon so slider values like 0.30000000000000004 pass
        let eps = 1e-9;
        if !self.temperature.is_finite()
            || self.temperature < MIN_TEMPERATURE - eps
            || self.temperature > MAX_TEMPERATURE + eps
        {
            return Err(format!(
                "temperature must be between {} and {}, got {}",
                MIN_TEMPERATURE, MAX_TEMPERATURE, self.temperature
            ));
        }
        Ok(())
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_new_tokens: 200,
            temperature: 0.5,
        }
    }
}

/// One call into the text generator. Built per turn and dropped after use.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_new_tokens: usize,
    pub temperature: f64,
    pub pad_token_id: u32,
    pub eos_token_id: u32,
    pub do_sample: bool,
    pub num_return_sequences: usize,
}

impl GenerationRequest {
    /// Sampling request with pad set to eos and a single returned sequence.
    pub fn sampled(prompt: String, settings: &GenerationSettings, eos_token_id: u32) -> Self {
        Self {
            prompt,
            max_new_tokens: settings.max_new_tokens,
            temperature: settings.temperature,
            pad_token_id: eos_token_id,
            eos_token_id,
            do_sample: true,
            num_return_sequences: 1,
        }
    }
}

/// Raw output of the generator: the prompt followed by the continuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub generated_text: String,
}

impl GenerationResult {
    pub fn new(generated_text: impl Into<String>) -> Self {
        Self {
            generated_text: generated_text.into(),
        }
    }
}
