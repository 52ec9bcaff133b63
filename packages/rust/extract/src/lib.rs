//! Document loading.
//!
//! Reads an input file and produces plain text for the pipeline, dispatching
//! on extension: `.txt`/`.md` pass through, `.docx` and `.pdf` go through
//! their extraction crates, `.rtf` is stripped by hand. Anything else is an
//! unsupported file type.

mod rtf;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use paperform_shared::{PaperformError, Result};

pub use rtf::strip_rtf;

static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("valid regex"));

/// Load a document from disk and return its plain-text content.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_document(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let raw = match extension.as_str() {
        "txt" | "md" => read_text(path)?,
        "docx" => read_docx(path)?,
        "pdf" => read_pdf(path)?,
        "rtf" => strip_rtf(&read_text(path)?),
        _ => {
            return Err(PaperformError::UnsupportedFileType { extension });
        }
    };

    let content = normalize_whitespace(&raw);
    debug!(chars = content.len(), format = %extension, "document loaded");
    Ok(content)
}

/// Accept already-loaded text (pasted input, stdin) and normalize it.
pub fn load_text(content: &str) -> String {
    normalize_whitespace(content)
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| PaperformError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_docx(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| PaperformError::io(path, e))?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| PaperformError::Extract(format!("failed to read docx: {e}")))?;

    let mut out = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            out.push_str(&paragraph.raw_text());
            out.push('\n');
        }
    }
    Ok(out)
}

fn read_pdf(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path)
        .map_err(|e| PaperformError::Extract(format!("failed to read pdf: {e}")))
}

/// Collapse runs of spaces, normalize paragraph breaks to exactly one blank
/// line, and trim the result. Extraction output (pdf especially) is noisy.
pub fn normalize_whitespace(content: &str) -> String {
    let collapsed = SPACES_RE.replace_all(content, " ");
    let paragraphs = BLANK_LINES_RE.replace_all(&collapsed, "\n\n");
    paragraphs
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
