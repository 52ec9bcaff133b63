//! Shared types, error model, and configuration for Paperform.
//!
//! This crate is the foundation depended on by all other Paperform crates.
//! It provides:
//! - [`PaperformError`] — the unified error type
//! - Domain types ([`DocumentMetadata`], [`CitationStyle`], [`Citation`],
//!   [`FormattedDocument`], [`MissingInfo`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ModelConfig, config_dir, config_file_path, expand_tilde,
    init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{PaperformError, Result};
pub use types::{
    Citation, CitationDelimiter, CitationKind, CitationStyle, DocumentMetadata, FlagOrigin,
    FormattedDocument, MetadataField, MissingInfo,
};
