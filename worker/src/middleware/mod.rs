pub mod auth;

// Re-export middleware functions
pub use auth::{WORKER_SECRET_HEADER, auth_middleware};
