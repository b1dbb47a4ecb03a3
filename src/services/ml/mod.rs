//! Text-generation collaborator

pub mod generator;
pub mod official;
pub mod service;
pub mod stub_mode;

pub use generator::{GeneratorLoader, TextGenerator};
pub use official::CandleGenerator;
pub use service::MLService;
pub use stub_mode::StubGenerator;

use crate::config::Config;

/// Loader for the backend selected by the config.
pub fn loader_for(config: &Config) -> GeneratorLoader {
    if config.stub_mode {
        Box::new(|| Ok(Box::new(StubGenerator::new()) as Box<dyn TextGenerator>))
    } else {
        let config = config.clone();
        Box::new(move || {
            CandleGenerator::load(&config).map(|g| Box::new(g) as Box<dyn TextGenerator>)
        })
    }
}
