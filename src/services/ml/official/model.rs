//! Text generation over candle's quantized llama implementation

use super::device::DeviceManager;
use super::loader::OfficialLoader;
use crate::config::Config;
use crate::services::ml::generator::TextGenerator;
use crate::types::{GenerationError, GenerationRequest, GenerationResult};
use candle_core::{Device, Tensor};
use candle_transformers::generation::{LogitsProcessor, Sampling};
use candle_transformers::models::quantized_llama::ModelWeights;
use std::time::Instant;
use tokenizers::Tokenizer;

/// End-of-sequence spellings tried, in order, when none is configured.
const EOS_CANDIDATES: &[&str] = &[
    "<|endoftext|>",
    "<|end_of_text|>",
    "<|eot_id|>",
    "<|im_end|>",
    "</s>",
    "<eos>",
];

pub struct CandleGenerator {
    weights: ModelWeights,
    tokenizer: Tokenizer,
    device: Device,
    eos_token_id: u32,
    context_length: usize,
    seed: u64,
}

impl CandleGenerator {
    /// Load the model and tokenizer named in the config
    pub fn load(config: &Config) -> Result<Self, GenerationError> {
        let unavailable = |what: &str, e: String| {
            GenerationError::ResourceUnavailable(format!("{}: {}", what, e))
        };

        let device = DeviceManager::from_config(&config.device)
            .map_err(|e| unavailable("device", e.to_string()))?;
        tracing::info!("🎮 Using device: {}", DeviceManager::device_info(&device));

        OfficialLoader::validate_gguf(&config.model_path)
            .map_err(|e| unavailable("model", e.to_string()))?;
        let loaded = OfficialLoader::load_gguf(&config.model_path, &device)
            .map_err(|e| unavailable("model", e.to_string()))?;

        let tokenizer = Tokenizer::from_file(&config.tokenizer_path)
            .map_err(|e| unavailable("tokenizer", e.to_string()))?;

        let eos_token_id = Self::resolve_eos(&tokenizer, config.eos_token.as_deref())
            .ok_or_else(|| unavailable("tokenizer", "no end-of-sequence token found".to_string()))?;

        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::info!("✅ Generator ready (eos={}, seed={})", eos_token_id, seed);

        Ok(Self {
            weights: loaded.weights,
            tokenizer,
            device,
            eos_token_id,
            context_length: loaded.context_length,
            seed,
        })
    }

    fn resolve_eos(tokenizer: &Tokenizer, configured: Option<&str>) -> Option<u32> {
        match configured {
            Some(token) => tokenizer.token_to_id(token),
            None => EOS_CANDIDATES
                .iter()
                .find_map(|token| tokenizer.token_to_id(token)),
        }
    }

    fn logits_processor(&mut self, request: &GenerationRequest) -> LogitsProcessor {
        let sampling = if request.do_sample && request.temperature > 0.0 {
            Sampling::All {
                temperature: request.temperature,
            }
        } else {
            Sampling::ArgMax
        };
        // Fresh seed per call so repeated questions do not replay the same sample
        self.seed = self.seed.wrapping_add(1);
        LogitsProcessor::from_sampling(self.seed, sampling)
    }

    fn forward(&mut self, tokens: &[u32], position: usize) -> candle_core::Result<Tensor> {
        let input = Tensor::new(tokens, &self.device)?.unsqueeze(0)?;
        // Logits of the last position only: shape (1, vocab)
        self.weights.forward(&input, position)?.squeeze(0)
    }

    fn generate_one(&mut self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let encoding = self
            .tokenizer
            .encode(request.prompt.as_str(), true)
            .map_err(|e| GenerationError::Inference(format!("tokenizer error: {}", e)))?;
        let prompt_tokens = encoding.get_ids().to_vec();

        if prompt_tokens.is_empty() {
            return Err(GenerationError::Inference("prompt produced no tokens".into()));
        }
        if prompt_tokens.len() >= self.context_length {
            return Err(GenerationError::Inference(format!(
                "prompt is {} tokens, model context is {}",
                prompt_tokens.len(),
                self.context_length
            )));
        }

        let budget = request
            .max_new_tokens
            .min(self.context_length - prompt_tokens.len());
        let mut processor = self.logits_processor(request);
        let started = Instant::now();

        // Prefill; position 0 also resets the model's kv cache
        let mut logits = self.forward(&prompt_tokens, 0)?;
        let mut position = prompt_tokens.len();
        let mut generated: Vec<u32> = Vec::with_capacity(budget);

        for _ in 0..budget {
            let next = processor.sample(&logits)?;
            if next == request.eos_token_id {
                tracing::debug!("[GENERATION] EOS after {} tokens", generated.len());
                break;
            }
            generated.push(next);

            logits = self.forward(&[next], position)?;
            position += 1;
        }

        let continuation = self
            .tokenizer
            .decode(&generated, true)
            .map_err(|e| GenerationError::Inference(format!("tokenizer decode error: {}", e)))?;

        let elapsed = started.elapsed();
        tracing::info!(
            "[GENERATION] {} prompt tokens, {} new tokens in {:?} ({:.2} tok/s)",
            prompt_tokens.len(),
            generated.len(),
            elapsed,
            generated.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );

        Ok(format!("{}{}", request.prompt, continuation))
    }
}

impl TextGenerator for CandleGenerator {
    fn eos_token_id(&self) -> u32 {
        self.eos_token_id
    }

    fn generate(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<Vec<GenerationResult>, GenerationError> {
        (0..request.num_return_sequences.max(1))
            .map(|_| self.generate_one(request).map(GenerationResult::new))
            .collect()
    }

    fn name(&self) -> &str {
        "candle-gguf"
    }
}
