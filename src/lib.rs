pub mod backend;
pub mod bench;
pub mod config;
pub mod demo;
pub mod error;
pub mod logging;
pub mod models;
pub mod startup;

// Re-export commonly used types for easier access
pub use backend::database::{UserRepository, UserTable};
pub use error::{AppError, AppResult};
pub use models::User;
