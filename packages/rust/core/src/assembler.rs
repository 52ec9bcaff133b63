//! Final document assembly.
//!
//! Deterministically combines title page, restructured body, works-cited
//! section, and the missing-information footer, then writes the artifact
//! to disk (write to temp, then rename).

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use paperform_shared::{
    Citation, DocumentMetadata, FormattedDocument, MetadataField, MissingInfo, PaperformError,
    Result,
};
use paperform_styles::{generate_works_cited, rewrite_citations, StyleRule};

/// Placeholder substituted for a title-page field the metadata lacks.
fn missing_placeholder(field: MetadataField) -> String {
    format!("[MISSING: {}]", field.as_str())
}

/// Assemble the formatted document. Same inputs always produce the same
/// output; nothing here reads the clock or the environment.
pub fn assemble(
    body: &str,
    rule: &StyleRule,
    metadata: &DocumentMetadata,
    citations: &[Citation],
    flags: Vec<MissingInfo>,
) -> FormattedDocument {
    let mut missing = flags;
    let title_page = build_title_page(rule, metadata, &mut missing);
    let formatted_body = format_body(body, citations, rule);
    let works_cited = generate_works_cited(citations, rule);

    let mut text = title_page;
    text.push_str("\n\n");
    text.push_str(&formatted_body);

    if !works_cited.is_empty() {
        text.push_str("\n\n");
        text.push_str(works_cited.trim_end());
    }

    let missing = dedupe_flags(missing);
    if !missing.is_empty() {
        text.push_str("\n\n");
        text.push_str(&flag_footer(&missing));
    }
    text.push('\n');

    debug!(
        chars = text.len(),
        flags = missing.len(),
        style = %rule.style,
        "document assembled"
    );

    FormattedDocument {
        text,
        missing,
        style: rule.style,
    }
}

/// Build the title page from the fields the style requires. Absent fields
/// render as placeholders and are recorded as metadata flags.
fn build_title_page(
    rule: &StyleRule,
    metadata: &DocumentMetadata,
    missing: &mut Vec<MissingInfo>,
) -> String {
    let mut page = String::new();

    if rule.running_head {
        let title = metadata.get(MetadataField::Title).unwrap_or("");
        page.push_str(&format!("Running head: {}\n\n", running_head(title)));
    }

    for &field in rule.title_page_fields {
        let value = match metadata.get(field) {
            Some(v) => v.to_string(),
            None => {
                missing.push(MissingInfo::metadata(field));
                missing_placeholder(field)
            }
        };

        match field {
            MetadataField::Title => {
                page.push_str(&value);
                page.push_str("\n\n");
            }
            MetadataField::Author => {
                page.push_str(&format!("By {value}\n\n"));
            }
            MetadataField::Course => page.push_str(&format!("Course: {value}\n")),
            MetadataField::Instructor => page.push_str(&format!("Instructor: {value}\n")),
            MetadataField::DueDate => page.push_str(&format!("Due Date: {value}\n")),
        }
    }

    page.trim_end().to_string()
}

/// Shortened all-caps title for the APA running head. Punctuation is
/// dropped; anything past 50 characters is cut to 47 plus an ellipsis.
fn running_head(title: &str) -> String {
    let mut head: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if head.chars().count() > 50 {
        head = head.chars().take(47).collect::<String>() + "...";
    }
    head
}

/// Indent each paragraph and rewrite in-text citations to the style's form.
fn format_body(body: &str, citations: &[Citation], rule: &StyleRule) -> String {
    let rewritten = rewrite_citations(body, citations, rule);
    rewritten
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("    {}", p.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Drop duplicate flags (case-insensitive label), keeping first occurrence.
fn dedupe_flags(flags: Vec<MissingInfo>) -> Vec<MissingInfo> {
    let mut seen = std::collections::HashSet::new();
    flags
        .into_iter()
        .filter(|f| seen.insert(f.label.to_lowercase()))
        .collect()
}

fn flag_footer(missing: &[MissingInfo]) -> String {
    let mut footer = String::from("Missing Information\n\n");
    for flag in missing {
        footer.push_str(&format!("- {}\n", flag.label));
    }
    footer.trim_end().to_string()
}

/// Write the formatted document into `dir` under its suggested filename.
/// The write is atomic: content lands in a temp file first, then renames.
pub fn write_artifact(dir: &Path, document: &FormattedDocument) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| PaperformError::io(dir, e))?;

    let filename = document.suggested_filename();
    let target = dir.join(&filename);
    let temp = dir.join(format!(".{filename}.tmp"));

    std::fs::write(&temp, &document.text).map_err(|e| PaperformError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| PaperformError::io(&target, e))?;

    info!(path = %target.display(), "artifact written");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperform_shared::CitationStyle;
    use paperform_styles::{extract_citations, style_rule};

    fn full_metadata() -> DocumentMetadata {
        DocumentMetadata {
            author: Some("Jane Doe".into()),
            title: Some("Language and Thought".into()),
            course: Some("LING 301".into()),
            instructor: Some("Dr. Reed".into()),
            due_date: Some("2026-05-01".into()),
        }
    }

    #[test]
    fn assembles_title_body_and_works_cited() {
        let body = "The debate continues (Whorf 213).";
        let citations = extract_citations(body);
        let rule = style_rule(CitationStyle::Mla);
        let doc = assemble(body, rule, &full_metadata(), &citations, vec![]);

        assert!(doc.text.starts_with("Language and Thought\n\nBy Jane Doe"));
        assert!(doc.text.contains("Course: LING 301"));
        assert!(doc.text.contains("    The debate continues (Whorf 213)."));
        assert!(doc.text.contains("Works Cited"));
        assert!(doc.missing.is_empty());
    }

    #[test]
    fn missing_author_becomes_placeholder_and_flag() {
        let mut metadata = full_metadata();
        metadata.author = None;
        let rule = style_rule(CitationStyle::Mla);
        let doc = assemble("Body.", rule, &metadata, &[], vec![]);

        assert!(doc.text.contains("By [MISSING: author]"));
        assert!(doc
            .missing
            .iter()
            .any(|m| m.label == "Title page field: author"));
    }

    #[test]
    fn apa_title_page_has_running_head() {
        let rule = style_rule(CitationStyle::Apa);
        let doc = assemble("Body.", rule, &full_metadata(), &[], vec![]);
        assert!(doc.text.starts_with("Running head: LANGUAGE AND THOUGHT\n"));
    }

    #[test]
    fn running_head_truncates_long_titles() {
        let long = "A".repeat(80);
        let head = running_head(&long);
        assert_eq!(head.chars().count(), 50);
        assert!(head.ends_with("..."));
    }

    #[test]
    fn ieee_title_page_skips_course_fields() {
        let rule = style_rule(CitationStyle::Ieee);
        let doc = assemble("Body.", rule, &full_metadata(), &[], vec![]);
        assert!(!doc.text.contains("Course:"));
        assert!(!doc.text.contains("Instructor:"));
    }

    #[test]
    fn duplicate_flags_collapse() {
        let rule = style_rule(CitationStyle::Harvard);
        let flags = vec![
            MissingInfo::analysis("Conclusion section"),
            MissingInfo::model("conclusion section"),
        ];
        let doc = assemble("Body.", rule, &full_metadata(), &[], flags);
        let count = doc
            .missing
            .iter()
            .filter(|m| m.label.eq_ignore_ascii_case("conclusion section"))
            .count();
        assert_eq!(count, 1);
        assert_eq!(doc.text.matches("onclusion section").count(), 1);
    }

    #[test]
    fn no_citations_means_no_works_cited_section() {
        let rule = style_rule(CitationStyle::Mla);
        let doc = assemble("Body without references.", rule, &full_metadata(), &[], vec![]);
        assert!(!doc.text.contains("Works Cited"));
    }

    #[test]
    fn assembly_is_deterministic() {
        let body = "First (Smith, 2019). Second (Adams 7).";
        let citations = extract_citations(body);
        let rule = style_rule(CitationStyle::Apa);
        let a = assemble(body, rule, &full_metadata(), &citations, vec![]);
        let b = assemble(body, rule, &full_metadata(), &citations, vec![]);
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn write_artifact_lands_at_suggested_filename() {
        let dir = std::env::temp_dir().join(format!("paperform-test-{}", std::process::id()));
        let doc = FormattedDocument {
            text: "content\n".into(),
            missing: vec![],
            style: CitationStyle::Mla,
        };
        let path = write_artifact(&dir, &doc).unwrap();
        assert_eq!(path.file_name().unwrap(), "formatted_document_mla.txt");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content\n");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
