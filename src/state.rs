use crate::config::Config;
use crate::services::conversation::PromptBuilder;
use crate::services::ml::{self, GeneratorLoader};
use crate::services::template::ChatTemplateService;
use crate::services::{MLService, SessionManager};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ml: Arc<MLService>, // generator is built lazily on the first turn
    pub prompts: Arc<PromptBuilder>,
    pub sessions: Arc<RwLock<SessionManager>>,
    pub templates: Arc<ChatTemplateService>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        tracing::info!("[STATE] Initializing AppState...");
        tracing::info!("[STATE]   Model path: {}", config.model_path);
        tracing::info!("[STATE]   Tokenizer path: {}", config.tokenizer_path);
        tracing::info!("[STATE]   Device: {:?}", config.device);
        if config.stub_mode {
            tracing::warn!("[STATE] Stub mode enabled, no model will be loaded");
        }

        let loader = ml::loader_for(&config);
        Self::with_loader(config, loader)
    }

    /// State backed by an explicit generator loader.
    pub fn with_loader(config: Config, loader: GeneratorLoader) -> Result<Self> {
        let ml = MLService::new(loader, config.generation_timeout);
        let prompts = PromptBuilder::new(config.prompt_token_budget);
        let templates = ChatTemplateService::new()?;

        Ok(Self {
            config: Arc::new(config),
            ml: Arc::new(ml),
            prompts: Arc::new(prompts),
            sessions: Arc::new(RwLock::new(SessionManager::new())),
            templates: Arc::new(templates),
        })
    }
}
