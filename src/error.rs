//! Error types for Preguntar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Preguntar operations.
///
/// Covers malformed construction, batch requests that exceed the unlabeled
/// pool, and composition rounds that stop making progress.
///
/// # Examples
///
/// ```
/// use preguntar::error::PreguntarError;
///
/// let err = PreguntarError::InsufficientPool {
///     requested: 10,
///     available: 3,
/// };
/// assert!(err.to_string().contains("unlabeled"));
/// ```
#[derive(Debug)]
pub enum PreguntarError {
    /// Malformed construction: empty strategy set, dataset mismatch,
    /// weights not summing to 1.0, a weight outside (0, 1].
    Configuration {
        /// What was wrong with the configuration
        message: String,
    },

    /// Requested batch size exceeds the available unlabeled entries.
    InsufficientPool {
        /// Number of entries requested
        requested: usize,
        /// Number of unlabeled entries available
        available: usize,
    },

    /// A composition round made zero net progress even after a retry.
    StalledComposition {
        /// Entries still outstanding when composition stalled
        outstanding: usize,
    },

    /// An entry identifier outside the dataset.
    UnknownEntry {
        /// The offending identifier
        entry_id: usize,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for PreguntarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreguntarError::Configuration { message } => {
                write!(f, "Invalid configuration: {message}")
            }
            PreguntarError::InsufficientPool {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Requested {requested} entries but only {available} unlabeled entries are available"
                )
            }
            PreguntarError::StalledComposition { outstanding } => {
                write!(
                    f,
                    "Composition stalled with {outstanding} entries outstanding after a zero-progress retry"
                )
            }
            PreguntarError::UnknownEntry { entry_id } => {
                write!(f, "No entry with identifier {entry_id}")
            }
            PreguntarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PreguntarError {}

impl From<&str> for PreguntarError {
    fn from(msg: &str) -> Self {
        PreguntarError::Other(msg.to_string())
    }
}

impl From<String> for PreguntarError {
    fn from(msg: String) -> Self {
        PreguntarError::Other(msg)
    }
}

impl PreguntarError {
    /// Create a configuration error with descriptive context
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, PreguntarError>;
