//! Error types for CrossForge

use thiserror::Error;

/// Main error type for CrossForge operations
#[derive(Debug, Error)]
pub enum CrossForgeError {
    /// Graph violates a structural invariant (dangling index, duplicate edge, wrong edge count)
    #[error("Model construction error: {0}")]
    ModelConstruction(String),

    /// Malformed PACE text input
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal solver error: {0}")]
    Internal(String),
}

impl CrossForgeError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Returns true for failures caused by the input rather than the solver.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ModelConstruction(_) | Self::Parse { .. } | Self::Io(_)
        )
    }
}

/// Result type alias for CrossForge operations
pub type Result<T> = std::result::Result<T, CrossForgeError>;
