//! Error types for Paperform.
//!
//! Library crates use [`PaperformError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Paperform operations.
#[derive(Debug, thiserror::Error)]
pub enum PaperformError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The input file has an extension we cannot read.
    #[error("unsupported file type: .{extension} (supported: .txt, .md, .docx, .pdf, .rtf)")]
    UnsupportedFileType { extension: String },

    /// The requested citation style is not one we know.
    #[error("unknown citation style: '{name}' (supported: mla, apa, chicago, harvard, ieee)")]
    UnknownStyle { name: String },

    /// Text extraction from an input file failed.
    #[error("extraction error: {0}")]
    Extract(String),

    /// External model call failed or returned malformed data.
    #[error("external service error: {0}")]
    ExternalService(String),

    /// Content parsing error (citations, metadata, model payload).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Data validation error (empty document, bad flag, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PaperformError>;

impl PaperformError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create an unsupported-file-type error from an extension.
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::UnsupportedFileType {
            extension: extension.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PaperformError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = PaperformError::unsupported("odt");
        assert!(err.to_string().contains(".odt"));

        let err = PaperformError::UnknownStyle {
            name: "turabian".into(),
        };
        assert!(err.to_string().contains("turabian"));
        assert!(err.to_string().contains("mla"));
    }
}
