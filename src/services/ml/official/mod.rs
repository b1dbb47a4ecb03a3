//! candle-backed generator for quantized GGUF llama-family models

pub mod device;
pub mod loader;
pub mod model;

pub use device::DeviceManager;
pub use loader::OfficialLoader;
pub use model::CandleGenerator;
