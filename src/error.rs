//! Error types for viabilidad operations.
//!
//! The taxonomy separates caller mistakes (`Validation`, `NotFound`) from
//! operational failures (`DataSource`) and configuration bugs (`Inference`).

use std::fmt;

/// Main error type for viabilidad operations.
///
/// # Examples
///
/// ```
/// use viabilidad::error::ViabilidadError;
///
/// let err = ViabilidadError::NotFound {
///     name: "Acme Corp".to_string(),
/// };
/// assert!(err.to_string().contains("Acme Corp"));
/// ```
#[derive(Debug)]
pub enum ViabilidadError {
    /// Empty or malformed caller input. User-correctable.
    Validation {
        /// What was wrong with the input.
        message: String,
    },

    /// The reference population could not be loaded. Operational.
    DataSource {
        /// Source description and underlying cause.
        message: String,
    },

    /// Model/feature-contract mismatch. A configuration bug: this should
    /// not occur in steady state.
    Inference {
        /// Which part of the feature contract was violated.
        message: String,
    },

    /// A named peer has no exact match in the reference population.
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for ViabilidadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViabilidadError::Validation { message } => {
                write!(f, "Validation failed: {message}")
            }
            ViabilidadError::DataSource { message } => {
                write!(f, "Reference population unavailable: {message}")
            }
            ViabilidadError::Inference { message } => {
                write!(f, "Feature contract violation: {message}")
            }
            ViabilidadError::NotFound { name } => {
                write!(f, "Peer '{name}' not found in reference population")
            }
            ViabilidadError::Io(e) => write!(f, "I/O error: {e}"),
            ViabilidadError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ViabilidadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViabilidadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViabilidadError {
    fn from(err: std::io::Error) -> Self {
        ViabilidadError::Io(err)
    }
}

impl From<&str> for ViabilidadError {
    fn from(msg: &str) -> Self {
        ViabilidadError::Other(msg.to_string())
    }
}

impl From<String> for ViabilidadError {
    fn from(msg: String) -> Self {
        ViabilidadError::Other(msg)
    }
}

impl ViabilidadError {
    /// Create a validation error from any displayable message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a data-source error from any displayable message.
    #[must_use]
    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSource {
            message: message.into(),
        }
    }

    /// Create an inference error naming the violated contract.
    #[must_use]
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ViabilidadError>;
