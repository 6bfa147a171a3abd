/*!
 * Error types for the phrasewai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The API answered successfully but carried no usable text
    #[error("API returned empty response")]
    EmptyResponse,

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The backend is not usable as configured (e.g. missing credential)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed document or request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error from the provider API
    #[error("Backend error: {0}")]
    Backend(#[from] ProviderError),
}

impl TranslationError {
    /// Only backend failures can succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// HTTP-equivalent status for reporting
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Configuration(_) | Self::Backend(_) => 500,
        }
    }
}
