/// cafe-cli library
///
/// Core functionality for the café management front-end.

pub mod cli;
pub mod core;
pub mod db;
pub mod error;

// Re-exports for convenience
pub use db::Database;
pub use error::{CafeError, Result};
