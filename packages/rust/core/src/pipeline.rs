//! End-to-end formatting pipeline: load → analyze → restructure → assemble.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use paperform_extract::{load_document, load_text};
use paperform_model::{ModelClient, ModelRequest};
use paperform_shared::{
    CitationStyle, DocumentMetadata, FormattedDocument, MissingInfo, PaperformError, Result,
};
use paperform_styles::{extract_citations, number_citations, style_rule, InTextPattern};

use crate::analysis::{analyze_missing_information, document_report};
use crate::assembler::{assemble, write_artifact};

/// Where the document content comes from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Read and extract from a file on disk.
    Path(PathBuf),
    /// Use content directly (tests, stdin).
    Text(String),
}

/// Configuration for one formatting run.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    pub input: InputSource,
    pub style: CitationStyle,
    pub metadata: DocumentMetadata,
    /// Directory to write the artifact into; `None` skips the write.
    pub output_dir: Option<PathBuf>,
}

/// Result of a formatting run.
#[derive(Debug)]
pub struct FormatResult {
    pub document: FormattedDocument,
    pub citation_count: usize,
    pub word_count: usize,
    /// Where the artifact landed, when an output directory was set.
    pub artifact_path: Option<PathBuf>,
    pub generated_at: DateTime<Utc>,
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &FormatResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &FormatResult) {}
}

/// Run the full formatting pipeline.
///
/// 1. Load and normalize the input document
/// 2. Extract in-text citations
/// 3. Analyze structure for missing information
/// 4. Restructure the body through the model
/// 5. Assemble title page, body, works cited, flags
/// 6. Write the artifact (if an output directory is set)
#[instrument(skip_all, fields(style = %config.style))]
pub async fn format_document<M: ModelClient>(
    config: &FormatConfig,
    model: &M,
    progress: &dyn ProgressReporter,
) -> Result<FormatResult> {
    let start = Instant::now();
    let rule = style_rule(config.style);

    // --- Phase 1: Load ---
    progress.phase("Loading document");
    let content = match &config.input {
        InputSource::Path(path) => load_document(path)?,
        InputSource::Text(text) => load_text(text),
    };
    if content.is_empty() {
        return Err(PaperformError::validation("document is empty"));
    }
    let word_count = document_report(&content).word_count;

    // --- Phase 2: Citations ---
    progress.phase("Extracting citations");
    let mut citations = extract_citations(&content);
    if rule.in_text == InTextPattern::Numbered {
        number_citations(&mut citations);
    }
    info!(count = citations.len(), "citations extracted");

    // --- Phase 3: Structure analysis ---
    progress.phase("Analyzing structure");
    let mut flags = analyze_missing_information(&content, rule);

    // --- Phase 4: Model restructuring ---
    progress.phase("Restructuring content");
    let request = ModelRequest {
        content: content.clone(),
        style: config.style,
        rule_summary: rule.summary(),
        metadata: config.metadata.clone(),
    };
    let response = model.restructure(&request).await?;
    // Deterministic flags come first; the model's observations follow.
    flags.extend(response.missing.into_iter().map(MissingInfo::model));

    // --- Phase 5: Assembly ---
    progress.phase("Assembling document");
    let document = assemble(&response.body, rule, &config.metadata, &citations, flags);

    // --- Phase 6: Artifact ---
    let artifact_path = match &config.output_dir {
        Some(dir) => {
            progress.phase("Writing artifact");
            Some(write_artifact(dir, &document)?)
        }
        None => None,
    };

    let result = FormatResult {
        citation_count: citations.len(),
        word_count,
        document,
        artifact_path,
        generated_at: Utc::now(),
        elapsed: start.elapsed(),
    };

    info!(
        citations = result.citation_count,
        words = result.word_count,
        flags = result.document.missing.len(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "formatting complete"
    );
    progress.done(&result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperform_model::StubModelClient;

    const SAMPLE: &str = "Title: Language and Thought\n\nIntroduction\n\n\
        Early work argued that language shapes thought (Whorf 213). Later \
        studies softened the claim (Smith, 2019), see \"the replication work\" \
        on p. 4.\n\nConclusion\n\nThe strong reading finds little support.";

    fn config(style: CitationStyle) -> FormatConfig {
        FormatConfig {
            input: InputSource::Text(SAMPLE.into()),
            style,
            metadata: DocumentMetadata {
                author: Some("Jane Doe".into()),
                title: Some("Language and Thought".into()),
                course: Some("LING 301".into()),
                instructor: Some("Dr. Reed".into()),
                due_date: Some("2026-05-01".into()),
            },
            output_dir: None,
        }
    }

    #[tokio::test]
    async fn formats_a_document_end_to_end() {
        let result = format_document(&config(CitationStyle::Mla), &StubModelClient, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(result.citation_count, 2);
        assert!(result.word_count > 0);
        assert!(result.document.text.contains("Language and Thought"));
        assert!(result.document.text.contains("Works Cited"));
        assert!(result.artifact_path.is_none());
    }

    #[tokio::test]
    async fn ieee_run_numbers_citations() {
        let result = format_document(&config(CitationStyle::Ieee), &StubModelClient, &SilentProgress)
            .await
            .unwrap();

        assert!(result.document.text.contains("[1]"));
        assert!(result.document.text.contains("[2]"));
        // Raw author-year forms are rewritten away.
        assert!(!result.document.text.contains("(Whorf 213)"));
    }

    #[tokio::test]
    async fn empty_document_is_rejected() {
        let mut config = config(CitationStyle::Mla);
        config.input = InputSource::Text("   \n\n  ".into());
        let err = format_document(&config, &StubModelClient, &SilentProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, PaperformError::Validation { .. }));
    }

    #[tokio::test]
    async fn output_is_deterministic_for_same_input() {
        let config = config(CitationStyle::Apa);
        let a = format_document(&config, &StubModelClient, &SilentProgress)
            .await
            .unwrap();
        let b = format_document(&config, &StubModelClient, &SilentProgress)
            .await
            .unwrap();
        assert_eq!(a.document.text, b.document.text);
        assert_eq!(a.document.missing, b.document.missing);
    }

    #[tokio::test]
    async fn missing_metadata_surfaces_as_flags() {
        let mut config = config(CitationStyle::Mla);
        config.metadata.instructor = None;
        let result = format_document(&config, &StubModelClient, &SilentProgress)
            .await
            .unwrap();

        assert!(result.document.text.contains("[MISSING: instructor]"));
        assert!(result
            .document
            .missing
            .iter()
            .any(|m| m.label == "Title page field: instructor"));
    }

    #[tokio::test]
    async fn artifact_written_when_output_dir_set() {
        let dir = std::env::temp_dir().join(format!("paperform-pipe-{}", std::process::id()));
        let mut config = config(CitationStyle::Harvard);
        config.output_dir = Some(dir.clone());

        let result = format_document(&config, &StubModelClient, &SilentProgress)
            .await
            .unwrap();

        let path = result.artifact_path.expect("artifact path");
        assert!(path.ends_with("formatted_document_harvard.txt"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, result.document.text);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
