//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `template-push` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures and ensure
//!   type safety.
//!
//! The `Error` enum is designed to be exhaustive and cover all possible
//! failure scenarios, including:
//!
//! - Push specification parsing errors.
//! - Invalid include or rename patterns.
//! - Failed requests against a release server API.
//! - Unexpected response payloads.
//! - Templates disappearing between planning and execution.
//! - Import container assembly errors.
//! - Network errors.
//! - I/O errors.
//! - JSON and YAML parsing errors.
//! - URL parsing errors.
//! - Lock poisoning.
//!
//! Each error variant includes a `message` field and potentially other
//! contextual information (e.g., `url`, `status`, `body`, `pattern`,
//! `context`, `id`).
//!
//! The `Result` type alias is used to return `Result<T, Error>` from
//! functions, making it easy to handle errors and propagate them up the
//! call stack.

use thiserror::Error;

/// Main error type for template-push operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the push specification file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Specification parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    SpecParse {
        message: String,
        /// Optional hint for how to fix the specification issue
        hint: Option<String>,
    },

    /// An include or rename pattern in the specification failed to compile.
    #[error("Invalid pattern [{pattern}]: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A release server API request completed with an unexpected status.
    ///
    /// Includes the failed operation, the HTTP status and the response body
    /// returned by the server.
    #[error("Request to {context} failed with status {status}, response: {body}")]
    Request {
        context: String,
        status: u16,
        body: String,
    },

    /// A release server response could not be interpreted.
    #[error("Invalid response from {context}: {message}")]
    InvalidResponse { context: String, message: String },

    /// A template that was matched during planning no longer exists locally.
    #[error("Template [{id}] was not found on the local instance")]
    MissingTemplate { id: String },

    /// An error occurred while assembling the import archive.
    #[error("Import archive error: {message}")]
    Archive { message: String },

    /// An error occurred during a network operation.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
