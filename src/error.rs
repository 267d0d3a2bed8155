/// Error types for cafe-cli
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for cafe-cli operations
#[derive(Error, Debug)]
pub enum CafeError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (terminal, file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Interactive prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Login is already taken by another user
    #[error("Login '{0}' is already taken")]
    LoginTaken(String),

    /// Login/password pair did not match any user
    #[error("Invalid login or password")]
    InvalidCredentials,

    /// No user with the given login
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Operation requires a role the current user does not have
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// No menu item with the given name
    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    /// No order with the given id
    #[error("Order not found: #{0}")]
    OrderNotFound(i64),

    /// Order has already been paid and can no longer be changed
    #[error("Order #{0} is already paid")]
    OrderAlreadyPaid(i64),

    /// Invalid user input (empty login, negative price, etc.)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input exceeds maximum allowed length
    #[error("Input exceeds maximum allowed length of {0} characters")]
    InputTooLong(usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for cafe-cli operations
pub type Result<T> = std::result::Result<T, CafeError>;

/// Convert CafeError to a user-friendly error message
impl CafeError {
    pub fn user_message(&self) -> String {
        match self {
            CafeError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            CafeError::Io(e) => {
                format!("Terminal error. Details: {}", e)
            }
            CafeError::Prompt(e) => {
                format!("Prompt failed. Details: {}", e)
            }
            CafeError::LoginTaken(login) => {
                format!("The login '{}' is already taken. Pick another one.", login)
            }
            CafeError::InvalidCredentials => "Login or password is incorrect.".to_string(),
            CafeError::UserNotFound(login) => {
                format!("No user with login '{}'", login)
            }
            CafeError::NotAuthorized(what) => {
                format!("You are not authorized to {}", what)
            }
            CafeError::ItemNotFound(name) => {
                format!("'{}' is not on the menu", name)
            }
            CafeError::OrderNotFound(id) => {
                format!("No order with id #{}", id)
            }
            CafeError::OrderAlreadyPaid(id) => {
                format!("Order #{} is already paid and cannot be changed", id)
            }
            CafeError::InvalidInput(reason) => {
                format!("Invalid input: {}", reason)
            }
            CafeError::InputTooLong(max) => {
                format!("Input exceeds maximum length of {} characters", max)
            }
            CafeError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            CafeError::Generic(msg) => msg.clone(),
        }
    }
}
