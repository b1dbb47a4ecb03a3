//! Chat-specific template rendering

use super::TemplateEngine;
use crate::types::generation::{
    GenerationSettings, MAX_NEW_TOKENS, MAX_TEMPERATURE, MIN_NEW_TOKENS, MIN_TEMPERATURE,
    NEW_TOKENS_STEP, TEMPERATURE_STEP,
};
use crate::types::Turn;
use minijinja::{context, Error};

pub const PAGE_TITLE: &str = "Basic Chatbot";
pub const PAGE_ICON: &str = "🤖";
pub const HEADING: &str = "🤖 Basic Chatbot for Software Engineers";
pub const CAPTION: &str = "Ask me anything related to software engineering!";
pub const INPUT_PLACEHOLDER: &str = "Ask a software engineering question...";
pub const CLEARED_NOTICE: &str = "Chat history cleared!";

pub struct ChatTemplateService {
    engine: TemplateEngine,
}

impl ChatTemplateService {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            engine: TemplateEngine::new()?,
        })
    }

    /// Full chat page with the session's history
    pub fn render_page(
        &self,
        session_id: &str,
        turns: &[Turn],
        settings: &GenerationSettings,
    ) -> Result<String, Error> {
        self.engine.render(
            "chat.html",
            context! {
                page_title => PAGE_TITLE,
                page_icon => PAGE_ICON,
                heading => HEADING,
                caption => CAPTION,
                input_placeholder => INPUT_PLACEHOLDER,
                session_id => session_id,
                turns => turns,
                settings => settings,
                limits => context! {
                    min_new_tokens => MIN_NEW_TOKENS,
                    max_new_tokens => MAX_NEW_TOKENS,
                    new_tokens_step => NEW_TOKENS_STEP,
                    min_temperature => MIN_TEMPERATURE,
                    max_temperature => MAX_TEMPERATURE,
                    temperature_step => TEMPERATURE_STEP,
                },
            },
        )
    }

    /// User bubble, optional error notice, assistant bubble
    pub fn render_turn(&self, turn: &Turn, error_message: Option<&str>) -> Result<String, Error> {
        self.engine.render(
            "components/turn.html",
            context! {
                turn => turn,
                error_message => error_message,
            },
        )
    }

    /// Success notice that also empties the transcript
    pub fn render_cleared(&self) -> Result<String, Error> {
        self.engine.render(
            "components/notice.html",
            context! {
                kind => "success",
                text => CLEARED_NOTICE,
                clear_transcript => true,
            },
        )
    }
}
