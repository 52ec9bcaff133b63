//! Core formatting pipeline: structure analysis, document assembly, and
//! the end-to-end orchestration that ties extraction, styles, and the
//! external model together.

pub mod analysis;
pub mod assembler;
pub mod pipeline;

pub use analysis::{analyze_missing_information, document_report, DocumentReport};
pub use assembler::{assemble, write_artifact};
pub use pipeline::{
    format_document, FormatConfig, FormatResult, InputSource, ProgressReporter, SilentProgress,
};
