// Error Handling
//
// *La Gestion des Erreurs* (The Error Management) - Typed failures of the CLI layer

use leregistre::RegistryError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for LeMaillage operations
pub type Result<T> = std::result::Result<T, MaillageError>;

/// LeMaillage error types
#[derive(Debug, Error)]
pub enum MaillageError {
    /// A sentinel line is absent from the target file
    #[error("Sentinel `{sentinel}` not found in {path:?}")]
    MissingSentinel {
        /// Sentinel text
        sentinel: &'static str,
        /// Target file
        path: PathBuf,
    },

    /// The end sentinel precedes the start sentinel
    #[error("End sentinel appears before start sentinel in {path:?}")]
    SentinelOrder {
        /// Target file
        path: PathBuf,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// How to fix it
        suggestion: Option<String>,
    },

    /// I/O errors with context
    #[error("I/O error: {context} (path: {path:?})")]
    Io {
        /// Operation that failed
        context: String,
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Registry could not be loaded
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl MaillageError {
    /// Create a config error
    pub fn config_error(message: impl Into<String>, suggestion: Option<String>) -> Self {
        MaillageError::Config {
            message: message.into(),
            suggestion,
        }
    }

    /// Create an I/O error with context
    pub fn io_error(context: impl Into<String>, path: &Path, source: std::io::Error) -> Self {
        MaillageError::Io {
            context: context.into(),
            path: path.to_path_buf(),
            source,
        }
    }

    /// Get user-friendly suggestion for recovery
    pub fn suggestion(&self) -> Option<String> {
        match self {
            MaillageError::Config { suggestion, .. } => suggestion.clone(),
            MaillageError::MissingSentinel { .. } | MaillageError::SentinelOrder { .. } => Some(
                "Add `// AUTO_LINKS_START` and `// AUTO_LINKS_END` lines, in that order, where the links map belongs.".to_string(),
            ),
            MaillageError::Registry(RegistryError::DuplicateUrl { .. }) => {
                Some("Each registry URL must appear exactly once.".to_string())
            }
            _ => None,
        }
    }
}

/// Format error for user display
///
/// Prints the whole context chain, then the recovery suggestion of the first
/// [`MaillageError`] found in it.
pub fn format_error(error: &anyhow::Error) -> String {
    let mut message = format!("Error: {error:#}");

    let typed = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<MaillageError>());
    if let Some(suggestion) = typed.and_then(MaillageError::suggestion) {
        message.push_str(&format!("\n\nSuggestion: {suggestion}"));
    }

    message
}
