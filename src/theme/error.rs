//! Theme loading errors.

use std::path::PathBuf;

/// Error returned when theme input cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    /// The theme file could not be read.
    #[error("failed to read theme file {}: {}", .path.display(), .message)]
    Io { path: PathBuf, message: String },

    /// A theme entry was declared with a name that is not a custom property.
    #[error("theme variable '{0}' must start with '--'")]
    InvalidName(String),

    /// An `@theme` block used an option keyword that is not recognized.
    #[error("unknown @theme option '{0}' (expected inline, reference or static)")]
    UnknownOption(String),
}
