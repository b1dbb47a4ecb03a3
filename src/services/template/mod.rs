//! Template rendering service

pub mod chat;
pub mod engine;

pub use chat::ChatTemplateService;
pub use engine::TemplateEngine;
