/// Database module for cafe-cli
///
/// Handles all database operations against PostgreSQL using sqlx.
/// Implements connection pooling for performance.

pub mod connection;
pub mod menu;
pub mod models;
pub mod orders;
pub mod users;

pub use connection::Database;
pub use models::*;
