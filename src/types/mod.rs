pub mod errors;
pub mod generation;
pub mod message;
pub mod session;

pub use errors::{AppError, GenerationError};
pub use generation::{GenerationRequest, GenerationResult, GenerationSettings};
pub use message::{ChatRequest, ClearRequest, HistoryExport, PageQuery};
pub use session::{ChatHistory, Turn};
