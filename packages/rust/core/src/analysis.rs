//! Deterministic document structure analysis.
//!
//! Scans the raw input for elements the chosen style requires and flags
//! what is absent. This runs before the model call, so the flags are
//! reproducible regardless of what the model reports.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use paperform_shared::{CitationStyle, MissingInfo};
use paperform_styles::{extract_citations, StyleRule};

static ABSTRACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(abstract|summary)\b").expect("valid regex"));
static INTRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(introduction|intro)\b").expect("valid regex"));
static CONCLUSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(conclusion|concluding)\b").expect("valid regex"));
static WORKS_CITED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(works cited|bibliography)\b").expect("valid regex"));
static REFERENCES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(references|reference list)\b").expect("valid regex"));
static NUMBERED_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("valid regex"));
static FOOTNOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s").expect("valid regex"));
static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|'[^']*'"#).expect("valid regex"));
static PAGE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"page \d+|p\. \d+|pp\. \d+").expect("valid regex"));
static SENTENCE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Indicators that title-page information is already present in the text.
const TITLE_INDICATORS: &[&str] = &["title:", "author:", "course:", "instructor:", "date:"];

/// Flag structural elements the style requires but the document lacks.
/// Flags come back in a fixed order so output is reproducible.
pub fn analyze_missing_information(content: &str, rule: &StyleRule) -> Vec<MissingInfo> {
    let lower = content.to_lowercase();
    let mut missing = Vec::new();

    if !TITLE_INDICATORS.iter().any(|ind| lower.contains(ind)) {
        missing.push(MissingInfo::analysis(
            "Title page information (title, author, course, instructor, date)",
        ));
    }

    if rule.expects_abstract && !ABSTRACT_RE.is_match(&lower) {
        missing.push(MissingInfo::analysis("Abstract section"));
    }

    if !INTRO_RE.is_match(&lower) {
        missing.push(MissingInfo::analysis("Introduction section"));
    }

    if !CONCLUSION_RE.is_match(&lower) {
        missing.push(MissingInfo::analysis("Conclusion section"));
    }

    if extract_citations(content).is_empty() {
        missing.push(MissingInfo::analysis("Citations and references"));
    }

    match rule.style {
        CitationStyle::Mla => {
            if !WORKS_CITED_RE.is_match(&lower) {
                missing.push(MissingInfo::analysis("Works Cited page"));
            }
        }
        CitationStyle::Apa => {
            if !REFERENCES_RE.is_match(&lower) {
                missing.push(MissingInfo::analysis("References page"));
            }
            if !lower.contains("running head") {
                missing.push(MissingInfo::analysis("Running head"));
            }
        }
        CitationStyle::Chicago => {
            if !FOOTNOTE_RE.is_match(content) && !lower.contains("bibliography") {
                missing.push(MissingInfo::analysis("Footnotes or bibliography"));
            }
        }
        CitationStyle::Ieee => {
            if !NUMBERED_REF_RE.is_match(content) {
                missing.push(MissingInfo::analysis("Numbered reference list"));
            }
        }
        CitationStyle::Harvard => {}
    }

    if !QUOTE_RE.is_match(content) {
        missing.push(MissingInfo::analysis("Properly formatted quotations"));
    }

    if !PAGE_NUMBER_RE.is_match(&lower) {
        missing.push(MissingInfo::analysis("Page numbering"));
    }

    debug!(flags = missing.len(), style = %rule.style, "structure analysis complete");
    missing
}

/// Word/sentence/paragraph statistics for the `report` command.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub character_count: usize,
    pub average_words_per_sentence: f64,
    /// Estimated reading time at 200 words per minute.
    pub reading_time_minutes: f64,
}

const READING_WPM: f64 = 200.0;

pub fn document_report(content: &str) -> DocumentReport {
    let word_count = content.split_whitespace().count();
    let sentence_count = SENTENCE_SPLIT_RE
        .split(content)
        .filter(|s| !s.trim().is_empty())
        .count();
    let paragraph_count = content
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .count();

    DocumentReport {
        word_count,
        sentence_count,
        paragraph_count,
        character_count: content.chars().count(),
        average_words_per_sentence: word_count as f64 / sentence_count.max(1) as f64,
        reading_time_minutes: word_count as f64 / READING_WPM,
    }
}
