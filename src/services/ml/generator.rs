//! Text generator seam

use crate::types::{GenerationError, GenerationRequest, GenerationResult};

/// A causal language model behind a text-generation interface.
///
/// Implementations are driven from the blocking thread pool, one request at
/// a time.
pub trait TextGenerator: Send {
    /// Token id that ends a sequence; also used for padding.
    fn eos_token_id(&self) -> u32;

    /// Runs one request and returns `num_return_sequences` results, each
    /// holding the prompt followed by the generated continuation.
    fn generate(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<Vec<GenerationResult>, GenerationError>;

    /// Short label for logs and the health endpoint.
    fn name(&self) -> &str;
}

/// Builds the generator on first use.
pub type GeneratorLoader =
    Box<dyn Fn() -> Result<Box<dyn TextGenerator>, GenerationError> + Send + Sync>;
