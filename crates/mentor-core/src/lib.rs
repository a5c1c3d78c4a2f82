pub mod assistant;
pub mod config;
pub mod conversation;
pub mod error;
pub mod notify;
pub mod problem;
pub mod secret;
pub mod surface;

// Re-export common error type
pub use error::MentorError;
