pub mod audio;
pub mod config;
pub mod core;
pub mod errors;
pub mod handlers;
pub mod livekit;
pub mod middleware;
pub mod playback;
pub mod routes;
pub mod session;
pub mod state;

// Re-export commonly used items for convenience
pub use config::WorkerConfig;
pub use errors::app_error::{AppError, AppResult};
pub use errors::auth_error::{AuthError, AuthResult};
pub use state::AppState;
