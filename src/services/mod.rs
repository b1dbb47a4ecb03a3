pub mod conversation;
pub mod ml;
pub mod session;
pub mod template;

pub use ml::MLService;
pub use session::SessionManager;
