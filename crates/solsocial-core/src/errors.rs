//! Categorized client errors
//!
//! A single error type for every store action and adapter, plus a category
//! that frontends use for toast routing instead of matching on message text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Toast severity a frontend should use when surfacing an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToastLevel {
    /// Informational
    Info,
    /// Something went wrong but may resolve on its own
    Warning,
    /// The action failed
    Error,
}

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// User input validation errors (correctable by user)
    Input,
    /// Configuration errors
    Config,
    /// Resource not found
    NotFound,
    /// Network connectivity or HTTP status errors (often transient)
    Network,
    /// Backend answered but refused the action
    Rejected,
    /// General operation failures (catch-all)
    Operation,
}

impl ErrorCategory {
    /// Check if this error category is user-correctable.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Input | Self::Config)
    }

    /// Check if this error category is likely transient.
    ///
    /// Transient errors may resolve on retry (or on the next poll tick).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get the appropriate toast severity for this category.
    #[must_use]
    pub fn toast_severity(&self) -> ToastLevel {
        match self {
            Self::Input => ToastLevel::Info,
            Self::Config => ToastLevel::Warning,
            Self::NotFound => ToastLevel::Warning,
            Self::Network => ToastLevel::Warning,
            Self::Rejected => ToastLevel::Error,
            Self::Operation => ToastLevel::Error,
        }
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Config => "Config",
            Self::NotFound => "Not Found",
            Self::Network => "Network",
            Self::Rejected => "Rejected",
            Self::Operation => "Operation",
        }
    }

    /// Get a hint for the user on how to resolve this category of error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::Input => "Check your input and try again",
            Self::Config => "Review your configuration settings",
            Self::NotFound => "The requested content could not be found",
            Self::Network => "Check your network connection and retry",
            Self::Rejected => "The server did not accept this action",
            Self::Operation => "An unexpected error occurred",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Unified error type for all client operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SocialError {
    /// Invalid input, rejected before any state change or network call
    #[error("Invalid: {message}")]
    Invalid {
        /// What was wrong with the input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Network or HTTP error
    #[error("Network error: {message}")]
    Network {
        /// Error message describing the network issue
        message: String,
        /// HTTP status when the server answered
        status: Option<u16>,
    },

    /// The backend answered but reported failure
    #[error("Rejected: {message}")]
    Rejected {
        /// Reason supplied by the backend, if any
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Local storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl SocialError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a network error without an HTTP status
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }

    /// Create a network error for a non-success HTTP status
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a rejection error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Category used by frontends to pick toast severity and hints.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Invalid { .. } => ErrorCategory::Input,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Network {
                status: Some(404), ..
            } => ErrorCategory::NotFound,
            Self::Network { .. } => ErrorCategory::Network,
            Self::Rejected { .. } => ErrorCategory::Rejected,
            Self::Config { .. } => ErrorCategory::Config,
            Self::Serialization { .. } | Self::Storage { .. } | Self::Internal { .. } => {
                ErrorCategory::Operation
            }
        }
    }

    /// Message suitable for a toast, without the variant prefix.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Invalid { message }
            | Self::NotFound { message }
            | Self::Network { message, .. }
            | Self::Rejected { message }
            | Self::Serialization { message }
            | Self::Storage { message }
            | Self::Config { message }
            | Self::Internal { message } => message,
        }
    }
}

/// Standard Result type for client operations
pub type Result<T> = std::result::Result<T, SocialError>;

impl From<serde_json::Error> for SocialError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for SocialError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::storage(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for SocialError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}
