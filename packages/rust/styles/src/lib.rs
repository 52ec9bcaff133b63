//! Citation style rules, extraction, and rendering.
//!
//! The style table defines formatting rules for the five supported
//! academic styles; extraction scans document text for in-text citations;
//! format and works_cited render citations into the target style.

pub mod extract;
pub mod format;
pub mod rules;
pub mod works_cited;

pub use extract::{extract_citations, number_citations};
pub use format::{format_in_text, rewrite_citations};
pub use rules::{lookup, style_rule, CitationField, InTextPattern, SortKey, StyleRule};
pub use works_cited::generate_works_cited;
