use super::generation::GenerationSettings;
use super::session::Turn;
use serde::{Deserialize, Serialize};

/// Form posted by the chat input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
    pub max_new_tokens: Option<usize>,
    pub temperature: Option<f64>,
}

impl ChatRequest {
    /// Slider values, falling back to the configured defaults for missing fields.
    pub fn settings(&self, defaults: &GenerationSettings) -> Result<GenerationSettings, String> {
        GenerationSettings::new(
            self.max_new_tokens.unwrap_or(defaults.max_new_tokens),
            self.temperature.unwrap_or(defaults.temperature),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub session_id: Option<String>,
}

/// JSON export of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryExport {
    pub session_id: String,
    pub turns: Vec<Turn>,
}
